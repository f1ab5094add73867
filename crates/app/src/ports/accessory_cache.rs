//! Accessory cache port: accessories persisted across restarts.
//!
//! The cache is the restore source: every entry is replayed once at startup,
//! whether or not its button is still configured.

use std::future::Future;

use buttonhub_domain::accessory::CachedAccessory;
use buttonhub_domain::error::BridgeError;
use buttonhub_domain::id::AccessoryId;

/// Persistent store of [`CachedAccessory`] entries.
pub trait AccessoryCache {
    /// Every persisted accessory, including ones written by other plugins.
    fn load_all(&self) -> impl Future<Output = Result<Vec<CachedAccessory>, BridgeError>> + Send;

    /// Insert or replace the entry with the same id.
    fn save(
        &self,
        accessory: CachedAccessory,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Drop the entry with `id`. Removing a missing entry is not an error.
    fn remove(&self, id: AccessoryId) -> impl Future<Output = Result<(), BridgeError>> + Send;
}
