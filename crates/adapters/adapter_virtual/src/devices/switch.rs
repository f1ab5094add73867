//! Stateless programmable switch: signals single, double and long presses.

use std::sync::Mutex;

use buttonhub_app::ports::{EventPublisher, SwitchService};
use buttonhub_domain::error::AccessoryError;
use buttonhub_domain::event::PressEvent;
use buttonhub_domain::id::AccessoryId;
use buttonhub_domain::press::PressKind;

use super::AccessoryInformation;

/// A switch with no on/off state; it only reports presses.
pub struct ProgrammableSwitch<P> {
    id: AccessoryId,
    info: AccessoryInformation,
    last_event: Mutex<Option<PressKind>>,
    publisher: P,
}

impl<P> ProgrammableSwitch<P> {
    /// Create the switch for `button`, publishing through `publisher`.
    pub fn new(id: AccessoryId, button: &str, publisher: P) -> Self {
        Self {
            id,
            info: AccessoryInformation {
                name: button.to_string(),
                manufacturer: "buttonhub".to_string(),
                model: "Virtual Button".to_string(),
                serial_number: id.to_string(),
                firmware_revision: env!("CARGO_PKG_VERSION").to_string(),
            },
            last_event: Mutex::new(None),
            publisher,
        }
    }

    #[must_use]
    pub fn info(&self) -> &AccessoryInformation {
        &self.info
    }

    /// The most recent press, as last reported to the host.
    #[must_use]
    pub fn last_event(&self) -> Option<PressKind> {
        *self
            .last_event
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<P> SwitchService for ProgrammableSwitch<P>
where
    P: EventPublisher + Send + Sync + 'static,
{
    async fn trigger_event(&self, kind: PressKind) -> Result<(), AccessoryError> {
        {
            let mut last = self
                .last_event
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *last = Some(kind);
        }

        let event = PressEvent::new(self.id, self.info.name.clone(), kind);
        self.publisher
            .publish(event)
            .await
            .map_err(|err| AccessoryError::TriggerRejected {
                button: self.info.name.clone(),
                reason: err.to_string(),
            })
    }
}
