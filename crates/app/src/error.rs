//! Startup errors: anything that aborts platform initialisation.

use std::time::Duration;

use buttonhub_domain::error::{AccessoryError, BridgeError};

/// Two distinct button names derived the same route path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("route {path} is already bound to {existing:?}, cannot bind it to {name:?}")]
pub struct RouteCollision {
    pub path: String,
    pub existing: String,
    pub name: String,
}

/// Errors that abort platform initialisation.
///
/// There is no degraded mode: any of these means the listener never starts.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("port call failed")]
    Bridge(#[from] BridgeError),

    #[error("accessory setup failed")]
    Accessory(#[from] AccessoryError),

    #[error("route collision")]
    RouteCollision(#[from] RouteCollision),

    #[error("accessories did not initialise within {0:?}")]
    InitTimeout(Duration),

    #[error("accessory setup task failed")]
    Join(#[from] tokio::task::JoinError),
}
