//! Platform: the startup protocol that turns configuration plus the
//! accessory cache into a frozen, routable registry.
//!
//! 1. Cached accessories are replayed ([`Platform::restore_cached`]).
//! 2. [`Platform::init`] reconciles configured buttons in order.
//! 3. `init` waits for every freshly created accessory to initialise, then
//!    persists them and hands back a [`ReadyPlatform`].
//!
//! `init` consumes the platform, so the protocol runs at most once per
//! instance.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use buttonhub_domain::accessory::CachedAccessory;
use buttonhub_domain::error::{AccessoryError, BridgeError};
use buttonhub_domain::id::AccessoryId;

use crate::accessory::{ButtonAccessory, Origin};
use crate::error::StartupError;
use crate::ports::{AccessoryCache, AccessoryFactory, SwitchService};
use crate::registry::{DiscardReason, Reconciled, Registry, RestoreOutcome};

/// Settings the platform needs from the configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Display name of the platform.
    pub name: String,
    /// Configured button names, in order. Duplicates are tolerated.
    pub buttons: Vec<String>,
    /// Upper bound on the initialisation join. `None` waits forever.
    pub init_timeout: Option<Duration>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: "Buttons".to_string(),
            buttons: Vec::new(),
            init_timeout: None,
        }
    }
}

/// A platform that has not yet run its startup protocol.
pub struct Platform<F: AccessoryFactory, C> {
    config: PlatformConfig,
    factory: Arc<F>,
    cache: C,
    registry: Registry<F::Service>,
    discarded: Vec<AccessoryId>,
}

impl<F, C> Platform<F, C>
where
    F: AccessoryFactory,
    C: AccessoryCache,
{
    /// Create a platform with an empty registry.
    pub fn new(config: PlatformConfig, factory: F, cache: C) -> Self {
        if config.buttons.is_empty() {
            tracing::warn!(platform = %config.name, "configuration issue: no buttons configured");
        }
        Self {
            config,
            factory: Arc::new(factory),
            cache,
            registry: Registry::new(),
            discarded: Vec::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry<F::Service> {
        &self.registry
    }

    /// Replay a single cached accessory.
    ///
    /// Entries of a foreign class or without a readable context are
    /// scheduled for removal from the cache once `init` succeeds.
    pub fn accessory_restored(&mut self, cached: &CachedAccessory) -> RestoreOutcome {
        let outcome = self.registry.restore(cached);
        if let RestoreOutcome::Discarded(
            DiscardReason::ForeignClass(_) | DiscardReason::MalformedContext,
        ) = outcome
        {
            self.discarded.push(cached.id);
        }
        outcome
    }

    /// Replay every accessory in the cache. Returns how many were restored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cache cannot be read.
    #[tracing::instrument(skip(self), fields(platform = %self.config.name))]
    pub async fn restore_cached(&mut self) -> Result<usize, BridgeError> {
        let cached = self.cache.load_all().await?;
        let restored = cached
            .iter()
            .filter(|entry| self.accessory_restored(entry) == RestoreOutcome::Restored)
            .count();
        tracing::info!(restored, cached = cached.len(), "cached accessories replayed");
        Ok(restored)
    }

    /// Reconcile the configuration, wait for new accessories to initialise
    /// and persist them.
    ///
    /// Restored accessories initialise in the background; only freshly
    /// created ones gate readiness.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] on a route collision, a failed or timed-out
    /// accessory setup, or a cache write failure.
    #[tracing::instrument(skip(self), fields(platform = %self.config.name))]
    pub async fn init(self) -> Result<ReadyPlatform<F::Service>, StartupError> {
        let Self {
            config,
            factory,
            cache,
            mut registry,
            mut discarded,
        } = self;

        let Reconciled { created, evicted } = registry.reconcile(&config.buttons)?;
        discarded.extend(evicted);

        for accessory in registry
            .accessories()
            .filter(|accessory| accessory.origin() == Origin::Restored)
        {
            let accessory = Arc::clone(accessory);
            let factory = Arc::clone(&factory);
            tokio::spawn(async move {
                if let Err(err) = accessory.initialise(&*factory).await {
                    tracing::error!(
                        %err,
                        button = %accessory.name(),
                        "restored accessory failed to initialise"
                    );
                }
            });
        }

        let mut jobs = JoinSet::new();
        for accessory in &created {
            let accessory = Arc::clone(accessory);
            let factory = Arc::clone(&factory);
            jobs.spawn(async move { accessory.initialise(&*factory).await });
        }

        match config.init_timeout {
            Some(limit) => tokio::time::timeout(limit, join_all(&mut jobs))
                .await
                .map_err(|_| StartupError::InitTimeout(limit))??,
            None => join_all(&mut jobs).await?,
        }

        persist(&cache, &created, &discarded).await?;

        tracing::info!(
            accessories = registry.len(),
            created = created.len(),
            "platform initialised"
        );
        Ok(ReadyPlatform {
            name: config.name,
            registry: Arc::new(registry),
        })
    }
}

async fn join_all(jobs: &mut JoinSet<Result<(), AccessoryError>>) -> Result<(), StartupError> {
    while let Some(result) = jobs.join_next().await {
        result??;
    }
    Ok(())
}

async fn persist<C, S>(
    cache: &C,
    created: &[Arc<ButtonAccessory<S>>],
    discarded: &[AccessoryId],
) -> Result<(), BridgeError>
where
    C: AccessoryCache,
    S: SwitchService,
{
    for id in discarded {
        cache.remove(*id).await?;
    }
    for accessory in created {
        let entry = CachedAccessory::from_context(accessory.context())
            .map_err(|err| BridgeError::Storage(Box::new(err)))?;
        cache.save(entry).await?;
    }
    Ok(())
}

/// A platform whose registry is complete and frozen.
///
/// Cloning is cheap; every clone reads the same registry.
pub struct ReadyPlatform<S> {
    name: String,
    registry: Arc<Registry<S>>,
}

impl<S> Clone for ReadyPlatform<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S> ReadyPlatform<S> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn registry(&self) -> Arc<Registry<S>> {
        Arc::clone(&self.registry)
    }
}
