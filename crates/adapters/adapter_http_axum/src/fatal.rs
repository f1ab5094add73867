//! Fatal escalation: faults the dispatcher cannot recover from are handed
//! to the process owner, which stops serving.

use std::any::Any;

use axum::body::Body;
use axum::http::Response;
use tokio::sync::mpsc;
use tower_http::catch_panic::ResponseForPanic;

use crate::error::{DispatchError, server_error};

/// Receiving end of the fatal channel, owned by the composition root.
pub type FatalReceiver = mpsc::UnboundedReceiver<DispatchError>;

/// Sending end of the fatal channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FatalSignal {
    sender: mpsc::UnboundedSender<DispatchError>,
}

impl FatalSignal {
    /// Create a connected signal/receiver pair.
    #[must_use]
    pub fn channel() -> (Self, FatalReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Escalate `err`. Dropped silently once the receiver is gone.
    pub fn raise(&self, err: DispatchError) {
        tracing::error!(error = %err, "fatal dispatch fault");
        let _ = self.sender.send(err);
    }
}

/// Answers a panicking handler with `500 Server error.` and escalates it.
#[derive(Debug, Clone)]
pub struct PanicResponder {
    fatal: FatalSignal,
}

impl PanicResponder {
    #[must_use]
    pub fn new(fatal: FatalSignal) -> Self {
        Self { fatal }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        self.fatal.raise(DispatchError::Panic(panic_message(err.as_ref())));
        server_error()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
