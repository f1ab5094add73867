//! Accessory descriptors: what is persisted about a button accessory and
//! what the host hands back when it restores one.

use serde::{Deserialize, Serialize};

use crate::id::AccessoryId;

/// Class name recorded for every accessory this bridge creates.
///
/// Cached accessories carrying any other class belong to a different
/// plugin or an incompatible version and are never restored.
pub const ACCESSORY_CLASS: &str = "ButtonAccessory";

/// Version stamped onto accessories persisted by this build.
pub const ACCESSORY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-accessory payload persisted alongside the cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryContext {
    /// The configured button name this accessory represents.
    pub button: String,
}

impl AccessoryContext {
    #[must_use]
    pub fn new(button: impl Into<String>) -> Self {
        Self {
            button: button.into(),
        }
    }
}

/// A persisted accessory as replayed by the host at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAccessory {
    pub class_name: String,
    pub version: String,
    pub id: AccessoryId,
    /// Display name shown by the host.
    pub name: String,
    /// Free-form context; only [`AccessoryContext`] is understood here, but
    /// foreign entries may carry anything.
    pub context: serde_json::Value,
}

impl CachedAccessory {
    /// Describe the accessory for `context` as this build would persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be encoded as JSON.
    pub fn from_context(context: &AccessoryContext) -> Result<Self, serde_json::Error> {
        Ok(Self {
            class_name: ACCESSORY_CLASS.to_string(),
            version: ACCESSORY_VERSION.to_string(),
            id: AccessoryId::for_button(&context.button),
            name: context.button.clone(),
            context: serde_json::to_value(context)?,
        })
    }

    /// Whether this entry was written by a compatible button accessory.
    #[must_use]
    pub fn is_button_accessory(&self) -> bool {
        self.class_name == ACCESSORY_CLASS
    }

    /// The `button` field of the context, if present.
    #[must_use]
    pub fn button(&self) -> Option<&str> {
        self.context.get("button").and_then(serde_json::Value::as_str)
    }

    /// Decode the context as an [`AccessoryContext`].
    ///
    /// # Errors
    ///
    /// Returns an error if the context does not carry a `button` string.
    pub fn accessory_context(&self) -> Result<AccessoryContext, serde_json::Error> {
        serde_json::from_value(self.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_stamp_class_and_derived_id_when_built_from_context() {
        let cached = CachedAccessory::from_context(&AccessoryContext::new("Kitchen")).unwrap();
        assert_eq!(cached.class_name, ACCESSORY_CLASS);
        assert_eq!(cached.version, ACCESSORY_VERSION);
        assert_eq!(cached.id, AccessoryId::for_button("Kitchen"));
        assert_eq!(cached.name, "Kitchen");
        assert_eq!(cached.button(), Some("Kitchen"));
    }

    #[test]
    fn should_recognise_own_class_only() {
        let mut cached = CachedAccessory::from_context(&AccessoryContext::new("Hall")).unwrap();
        assert!(cached.is_button_accessory());
        cached.class_name = "SomeOtherPlugin".to_string();
        assert!(!cached.is_button_accessory());
    }

    #[test]
    fn should_decode_accessory_context() {
        let cached = CachedAccessory::from_context(&AccessoryContext::new("Porch")).unwrap();
        assert_eq!(
            cached.accessory_context().unwrap(),
            AccessoryContext::new("Porch")
        );
    }

    #[test]
    fn should_fail_to_decode_context_without_button() {
        let cached = CachedAccessory {
            class_name: ACCESSORY_CLASS.to_string(),
            version: "0.0.1".to_string(),
            id: AccessoryId::new(),
            name: "Broken".to_string(),
            context: serde_json::json!({"unrelated": 1}),
        };
        assert!(cached.button().is_none());
        assert!(cached.accessory_context().is_err());
    }
}
