//! # buttonhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` accessory cache using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`AccessoryCache`](buttonhub_app::ports::AccessoryCache) port
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between [`CachedAccessory`](buttonhub_domain::accessory::CachedAccessory) and rows
//!
//! ## Dependency rule
//! Depends on `buttonhub-app` (for port traits) and `buttonhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod accessory_cache;
mod error;
mod pool;

pub use accessory_cache::SqliteAccessoryCache;
pub use error::StorageError;
pub use pool::{Config, Database};
