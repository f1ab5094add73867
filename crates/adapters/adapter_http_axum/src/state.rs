//! Shared application state for axum handlers.

use std::sync::Arc;

use buttonhub_app::registry::Registry;

use crate::fatal::FatalSignal;

/// State shared by every dispatch handler.
///
/// `Clone` is implemented manually so the switch service type does not need
/// to be `Clone`; only the `Arc` is cloned.
pub struct AppState<S> {
    /// Frozen registry built by the platform at startup.
    pub registry: Arc<Registry<S>>,
    /// Escalation channel for unhandled faults.
    pub fatal: FatalSignal,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            fatal: self.fatal.clone(),
        }
    }
}

impl<S> AppState<S> {
    pub fn new(registry: Arc<Registry<S>>, fatal: FatalSignal) -> Self {
        Self { registry, fatal }
    }
}
