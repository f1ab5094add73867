//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Namespace for name-derived accessory identifiers.
const ACCESSORY_NAMESPACE: uuid::Uuid =
    uuid::Uuid::from_u128(0x6b1f_3c2e_0a5d_4c7e_9d21_8e44_b0c3_5a17);

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a button accessory.
    AccessoryId
);

define_id!(
    /// Unique identifier for a [`PressEvent`](crate::event::PressEvent).
    EventId
);

impl AccessoryId {
    /// Derive the identifier for the accessory of button `name`.
    ///
    /// The same name always yields the same id, which keeps persisted
    /// accessories addressable across restarts.
    #[must_use]
    pub fn for_button(name: &str) -> Self {
        Self(uuid::Uuid::new_v5(&ACCESSORY_NAMESPACE, name.as_bytes()))
    }
}
