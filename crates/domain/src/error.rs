//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! via `#[from]`.

use std::error::Error as StdError;

/// Base error for everything that crosses a port boundary.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("accessory error")]
    Accessory(#[from] AccessoryError),

    #[error("storage error")]
    Storage(#[source] Box<dyn StdError + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The event name is not one of the accepted literals.
    #[error("unknown button event {0:?}")]
    UnknownEvent(String),
}

/// A lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failures raised by the accessory object model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessoryError {
    /// Setup of the accessory failed; it will never become ready.
    #[error("accessory {button} failed to initialise: {reason}")]
    SetupFailed { button: String, reason: String },

    /// The accessory was triggered after its setup had failed.
    #[error("accessory {0} is not initialised")]
    NotInitialised(String),

    /// The host did not accept the emitted press signal.
    #[error("accessory {button} rejected the press signal: {reason}")]
    TriggerRejected { button: String, reason: String },
}
