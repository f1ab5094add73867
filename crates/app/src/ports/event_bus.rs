//! Event bus port: press events handed to the host.

use std::future::Future;

use buttonhub_domain::error::BridgeError;
use buttonhub_domain::event::PressEvent;

/// Publishes press events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: PressEvent) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: PressEvent) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(event)
    }
}
