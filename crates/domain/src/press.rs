//! Button events and the press kinds they classify into.
//!
//! An inbound notification names a [`ButtonEvent`]; parsing that name is the
//! validation step. Once parsed, [`ButtonEvent::press_kind`] is total: every
//! accepted literal maps to exactly one [`PressKind`] and nothing else can
//! reach the classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The kind of a button activation, as signalled to the host.
///
/// The discriminants are the ordinals the host expects
/// (`0` single, `1` double, `2` long).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PressKind {
    Single = 0,
    Double = 1,
    Long = 2,
}

impl PressKind {
    /// The host-facing ordinal of this press kind.
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Double => f.write_str("double"),
            Self::Long => f.write_str("long"),
        }
    }
}

/// One of the event names accepted on a button route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonEvent {
    Click,
    DoubleClick,
    Hold,
    SinglePress,
    DoublePress,
    LongPress,
}

impl ButtonEvent {
    /// Every accepted event, in the order they are documented.
    pub const ALL: [Self; 6] = [
        Self::Click,
        Self::DoubleClick,
        Self::Hold,
        Self::SinglePress,
        Self::DoublePress,
        Self::LongPress,
    ];

    /// The wire literal for this event.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "double-click",
            Self::Hold => "hold",
            Self::SinglePress => "single-press",
            Self::DoublePress => "double-press",
            Self::LongPress => "long-press",
        }
    }

    /// Classify this event into the press kind signalled to the host.
    #[must_use]
    pub fn press_kind(self) -> PressKind {
        match self {
            Self::Click | Self::SinglePress => PressKind::Single,
            Self::DoubleClick | Self::DoublePress => PressKind::Double,
            Self::Hold | Self::LongPress => PressKind::Long,
        }
    }
}

impl FromStr for ButtonEvent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownEvent(s.to_string()))
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ButtonEvent> for PressKind {
    fn from(event: ButtonEvent) -> Self {
        event.press_kind()
    }
}
