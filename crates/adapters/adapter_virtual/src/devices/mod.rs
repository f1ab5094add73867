//! Virtual device implementations.
//!
//! Each switch carries the accessory id it was set up with, so its serial
//! number stays stable across restarts.

mod switch;

pub use switch::ProgrammableSwitch;

/// Descriptive metadata the host shows for an accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_revision: String,
}
