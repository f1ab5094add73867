//! Press event: an immutable record of a button firing.
//!
//! Press events are published to the host each time an accessory's trigger
//! is invoked, so that client applications can react to them.

use serde::{Deserialize, Serialize};

use crate::id::{AccessoryId, EventId};
use crate::press::PressKind;
use crate::time::{Timestamp, now};

/// A button activation as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressEvent {
    pub id: EventId,
    pub accessory_id: AccessoryId,
    pub button: String,
    pub kind: PressKind,
    pub timestamp: Timestamp,
}

impl PressEvent {
    /// Record a press of `kind` on the accessory for `button`, stamped now.
    #[must_use]
    pub fn new(accessory_id: AccessoryId, button: impl Into<String>, kind: PressKind) -> Self {
        Self {
            id: EventId::new(),
            accessory_id,
            button: button.into(),
            kind,
            timestamp: now(),
        }
    }
}
