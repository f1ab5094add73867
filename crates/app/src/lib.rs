//! # buttonhub-app
//!
//! Application layer — the accessory registry and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AccessoryCache`: persisted accessories replayed at startup
//!   - `AccessoryFactory` / `SwitchService`: the accessory object model
//!   - `EventPublisher`: press events delivered to the host
//! - Own the **accessory record** (alive flag, one-shot initialisation,
//!   trigger) and the **registry** keyed by button name
//! - Run the **startup protocol**: restore, reconcile against configuration,
//!   join on initialisation
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `buttonhub-domain` only (plus `tokio` for sync primitives and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod accessory;
pub mod error;
pub mod event_bus;
pub mod platform;
pub mod ports;
pub mod registry;

#[cfg(test)]
mod test_support;
