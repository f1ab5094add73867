//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod accessory;
pub mod accessory_cache;
pub mod event_bus;

pub use accessory::{AccessoryFactory, SwitchService};
pub use accessory_cache::AccessoryCache;
pub use event_bus::EventPublisher;
