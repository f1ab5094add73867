//! In-process press bus backed by a tokio broadcast channel.
//!
//! This is the host-facing side of every accessory: each press lands here
//! and any number of [`PressSubscription`]s (the daemon's logger, tests,
//! clients) observe it, either for every button or for a single one.
//!
//! A subscriber that falls behind loses the oldest presses. The loss is
//! logged and counted, and the subscription keeps delivering from the
//! oldest press still buffered.

use std::future::Future;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, SendError, TryRecvError};

use buttonhub_domain::error::BridgeError;
use buttonhub_domain::event::PressEvent;

use crate::ports::EventPublisher;

/// Fan-out of press events to every live subscription.
pub struct InProcessEventBus {
    sender: broadcast::Sender<PressEvent>,
}

impl InProcessEventBus {
    /// Create a bus buffering at most `capacity` presses per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Presses of every button published after this call.
    #[must_use]
    pub fn subscribe(&self) -> PressSubscription {
        PressSubscription::new(self.sender.subscribe(), None)
    }

    /// Presses of `button` only, published after this call.
    #[must_use]
    pub fn subscribe_button(&self, button: impl Into<String>) -> PressSubscription {
        PressSubscription::new(self.sender.subscribe(), Some(button.into()))
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscribers(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: PressEvent) -> impl Future<Output = Result<(), BridgeError>> + Send {
        if let Err(SendError(event)) = self.sender.send(event) {
            tracing::trace!(button = %event.button, kind = %event.kind, "press had no subscriber");
        }
        async { Ok(()) }
    }
}

/// One subscriber's view of the bus.
pub struct PressSubscription {
    receiver: broadcast::Receiver<PressEvent>,
    button: Option<String>,
    skipped: u64,
}

impl PressSubscription {
    fn new(receiver: broadcast::Receiver<PressEvent>, button: Option<String>) -> Self {
        Self {
            receiver,
            button,
            skipped: 0,
        }
    }

    /// The button this subscription is limited to, if any.
    #[must_use]
    pub fn button(&self) -> Option<&str> {
        self.button.as_deref()
    }

    /// Presses lost so far because this subscriber lagged.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Wait for the next matching press. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<PressEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The next matching press already buffered, without waiting.
    pub fn try_next(&mut self) -> Option<PressEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    fn matches(&self, event: &PressEvent) -> bool {
        self.button
            .as_deref()
            .is_none_or(|button| button == event.button)
    }

    fn lagged(&mut self, skipped: u64) {
        self.skipped += skipped;
        tracing::warn!(
            skipped,
            total = self.skipped,
            button = self.button.as_deref().unwrap_or("*"),
            "press subscriber lagging"
        );
    }
}
