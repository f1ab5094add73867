//! Accessory model port: the object the host exposes for each button.
//!
//! The registry never talks to the host directly. It asks an
//! [`AccessoryFactory`] to set up one [`SwitchService`] per button and then
//! forwards classified presses to it.

use std::future::Future;

use buttonhub_domain::accessory::AccessoryContext;
use buttonhub_domain::error::AccessoryError;
use buttonhub_domain::id::AccessoryId;
use buttonhub_domain::press::PressKind;

/// A stateless programmable switch: something that can signal a press.
pub trait SwitchService: Send + Sync + 'static {
    /// Emit a press of `kind` towards the host.
    ///
    /// Must succeed for every [`PressKind`] once the service exists; an error
    /// means the host side is broken, not that the press was invalid.
    fn trigger_event(&self, kind: PressKind)
    -> impl Future<Output = Result<(), AccessoryError>> + Send;
}

/// Builds the [`SwitchService`] backing one accessory.
///
/// Setup is asynchronous and may take arbitrarily long; the accessory record
/// reports readiness only once it resolves.
pub trait AccessoryFactory: Send + Sync + 'static {
    type Service: SwitchService;

    fn setup(
        &self,
        id: AccessoryId,
        context: &AccessoryContext,
    ) -> impl Future<Output = Result<Self::Service, AccessoryError>> + Send;
}
