//! Accessory record: one virtual button as tracked by the registry.
//!
//! A record is created either fresh (a configured button seen for the first
//! time) or restored (replayed from the accessory cache). Either way its
//! [`SwitchService`] is set up asynchronously; the record exposes a one-shot
//! readiness signal that resolves exactly once, to ready or failed.

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use buttonhub_domain::accessory::AccessoryContext;
use buttonhub_domain::error::AccessoryError;
use buttonhub_domain::id::AccessoryId;
use buttonhub_domain::press::PressKind;
use buttonhub_domain::route::route_path;

use crate::ports::{AccessoryFactory, SwitchService};

/// How a record entered the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Built from a configured button that had no registry entry.
    Created,
    /// Replayed from the accessory cache at startup.
    Restored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InitState {
    Pending,
    Ready,
    Failed(AccessoryError),
}

/// A button accessory: name, alive flag, trigger capability and readiness.
pub struct ButtonAccessory<S> {
    id: AccessoryId,
    context: AccessoryContext,
    origin: Origin,
    alive: AtomicBool,
    started: AtomicBool,
    service: OnceLock<S>,
    state: watch::Sender<InitState>,
}

impl<S> fmt::Debug for ButtonAccessory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonAccessory")
            .field("name", &self.context.button)
            .field("origin", &self.origin)
            .field("alive", &self.alive.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<S: SwitchService> ButtonAccessory<S> {
    /// A fresh record for a configured button. Starts alive.
    #[must_use]
    pub fn created(context: AccessoryContext) -> Self {
        let id = AccessoryId::for_button(&context.button);
        Self::with_origin(id, context, Origin::Created, true)
    }

    /// A record replayed from the cache. Starts dead until the configuration
    /// confirms it with [`set_alive`](Self::set_alive).
    #[must_use]
    pub fn restored(id: AccessoryId, context: AccessoryContext) -> Self {
        Self::with_origin(id, context, Origin::Restored, false)
    }

    fn with_origin(
        id: AccessoryId,
        context: AccessoryContext,
        origin: Origin,
        alive: bool,
    ) -> Self {
        let (state, _) = watch::channel(InitState::Pending);
        Self {
            id,
            context,
            origin,
            alive: AtomicBool::new(alive),
            started: AtomicBool::new(false),
            service: OnceLock::new(),
            state,
        }
    }

    #[must_use]
    pub fn id(&self) -> AccessoryId {
        self.id
    }

    /// The button name. Immutable for the life of the record.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.context.button
    }

    #[must_use]
    pub fn context(&self) -> &AccessoryContext {
        &self.context
    }

    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The route this accessory is bound to, recomputed from its name.
    #[must_use]
    pub fn route(&self) -> String {
        route_path(self.name())
    }

    /// Whether the button is present in the current configuration.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Mark the record as configured. Idempotent; never rebuilds anything.
    pub fn set_alive(&self) {
        self.alive.store(true, Ordering::Relaxed);
    }

    /// Whether setup has completed successfully.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(*self.state.borrow(), InitState::Ready)
    }

    /// Run the factory's setup for this record and fire the readiness signal.
    ///
    /// Only the first call performs setup; later calls wait for its outcome.
    ///
    /// # Errors
    ///
    /// Returns the [`AccessoryError`] the setup failed with.
    pub async fn initialise<F>(&self, factory: &F) -> Result<(), AccessoryError>
    where
        F: AccessoryFactory<Service = S>,
    {
        if self.started.swap(true, Ordering::AcqRel) {
            return self.initialised().await;
        }

        match factory.setup(self.id, &self.context).await {
            Ok(service) => {
                // `started` guarantees this is the only writer.
                let _ = self.service.set(service);
                self.state.send_replace(InitState::Ready);
                tracing::debug!(button = %self.name(), "accessory initialised");
                Ok(())
            }
            Err(err) => {
                self.state.send_replace(InitState::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Resolve once setup has finished, successfully or not.
    ///
    /// # Errors
    ///
    /// Returns the setup error if initialisation failed.
    pub async fn initialised(&self) -> Result<(), AccessoryError> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| *state != InitState::Pending)
            .await
            .map(|state| state.clone())
            .map_err(|_| AccessoryError::NotInitialised(self.name().to_string()))?;

        match state {
            InitState::Failed(err) => Err(err),
            InitState::Ready | InitState::Pending => Ok(()),
        }
    }

    /// Signal a press of `kind`. Waits for initialisation if it is still
    /// in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if setup failed or the switch service rejected the
    /// signal.
    pub async fn trigger(&self, kind: PressKind) -> Result<(), AccessoryError> {
        self.initialised().await?;
        let service = self
            .service
            .get()
            .ok_or_else(|| AccessoryError::NotInitialised(self.name().to_string()))?;

        tracing::debug!(button = %self.name(), %kind, "triggering press");
        service.trigger_event(kind).await
    }
}
