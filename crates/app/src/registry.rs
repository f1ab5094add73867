//! Registry & reconciler: the button-name → accessory mapping.
//!
//! Each name moves through `absent → restored | created → alive`. Restored
//! records come from the accessory cache; created records come from
//! configured buttons that were not restored. Every registered record has
//! exactly one bound route, and no two records share a route.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use buttonhub_domain::accessory::{AccessoryContext, CachedAccessory};
use buttonhub_domain::id::AccessoryId;

use crate::accessory::ButtonAccessory;
use crate::error::RouteCollision;
use crate::ports::SwitchService;

/// Why a cached accessory was not restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// Written by another plugin or an incompatible accessory type.
    ForeignClass(String),
    /// The context does not name a button.
    MalformedContext,
    /// A record for the same button is already registered.
    Duplicate,
    /// Its route is already taken by a differently named button.
    RouteCollision(RouteCollision),
}

/// Result of replaying one cached accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Discarded(DiscardReason),
}

/// What [`Registry::reconcile`] changed.
pub struct Reconciled<S> {
    /// Records built for configured buttons that were not registered.
    pub created: Vec<Arc<ButtonAccessory<S>>>,
    /// Stale restored records unbound to free their route for a configured
    /// button. Their cache entries are obsolete.
    pub evicted: Vec<AccessoryId>,
}

/// Accessories keyed by button name, plus the routes bound to them.
pub struct Registry<S> {
    accessories: HashMap<String, Arc<ButtonAccessory<S>>>,
    /// Route path → button name.
    routes: BTreeMap<String, String>,
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self {
            accessories: HashMap::new(),
            routes: BTreeMap::new(),
        }
    }
}

impl<S: SwitchService> Registry<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ButtonAccessory<S>>> {
        self.accessories.get(name)
    }

    /// The accessory bound to route `path`, if any.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Arc<ButtonAccessory<S>>> {
        self.routes
            .get(path)
            .and_then(|name| self.accessories.get(name))
    }

    /// Every bound route with its accessory, ordered by path.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &Arc<ButtonAccessory<S>>)> {
        self.routes
            .iter()
            .filter_map(|(path, name)| Some((path.as_str(), self.accessories.get(name)?)))
    }

    /// Every registered accessory, in no particular order.
    pub fn accessories(&self) -> impl Iterator<Item = &Arc<ButtonAccessory<S>>> {
        self.accessories.values()
    }

    fn bind(&mut self, accessory: Arc<ButtonAccessory<S>>) -> Result<(), RouteCollision> {
        let path = accessory.route();
        if let Some(existing) = self.routes.get(&path) {
            return Err(RouteCollision {
                path,
                existing: existing.clone(),
                name: accessory.name().to_string(),
            });
        }

        tracing::info!(button = %accessory.name(), uri = %path, "event URI bound");
        self.routes.insert(path, accessory.name().to_string());
        self.accessories.insert(accessory.name().to_string(), accessory);
        Ok(())
    }

    /// Replay one cached accessory.
    ///
    /// Foreign, malformed, duplicate or colliding entries are discarded with
    /// a warning; nothing is registered for them.
    pub fn restore(&mut self, cached: &CachedAccessory) -> RestoreOutcome {
        let reason = match self.try_restore(cached) {
            Ok(()) => return RestoreOutcome::Restored,
            Err(reason) => reason,
        };

        tracing::warn!(
            class_name = %cached.class_name,
            button = cached.button().unwrap_or(&cached.name),
            reason = ?reason,
            "removing cached accessory"
        );
        RestoreOutcome::Discarded(reason)
    }

    fn try_restore(&mut self, cached: &CachedAccessory) -> Result<(), DiscardReason> {
        if !cached.is_button_accessory() {
            return Err(DiscardReason::ForeignClass(cached.class_name.clone()));
        }
        let context = cached
            .accessory_context()
            .map_err(|_| DiscardReason::MalformedContext)?;
        if self.accessories.contains_key(&context.button) {
            return Err(DiscardReason::Duplicate);
        }

        let accessory = Arc::new(ButtonAccessory::restored(cached.id, context));
        self.bind(accessory).map_err(DiscardReason::RouteCollision)
    }

    /// Reconcile the configured buttons against the registry, in order.
    ///
    /// Unknown names get a fresh, alive record with a bound route; known
    /// names (restored, or repeated in the configuration) are marked alive.
    /// A restored record that is still dead when a new button needs its
    /// route is evicted, so renaming a button across restarts rebinds the
    /// route instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`RouteCollision`] when a new button's route is already bound
    /// to another configured name.
    pub fn reconcile<I>(&mut self, buttons: I) -> Result<Reconciled<S>, RouteCollision>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut reconciled = Reconciled {
            created: Vec::new(),
            evicted: Vec::new(),
        };
        for button in buttons {
            let button = button.as_ref();
            if let Some(existing) = self.accessories.get(button) {
                existing.set_alive();
                continue;
            }

            let accessory = Arc::new(ButtonAccessory::created(AccessoryContext::new(button)));
            if let Some(stale) = self.evict_stale(&accessory.route()) {
                tracing::warn!(
                    button = %button,
                    stale = %stale.name(),
                    uri = %accessory.route(),
                    "replacing stale accessory on event URI"
                );
                reconciled.evicted.push(stale.id());
            }
            self.bind(Arc::clone(&accessory))?;
            reconciled.created.push(accessory);
        }
        Ok(reconciled)
    }

    /// Unbind the record holding `path` if the configuration has not
    /// confirmed it.
    fn evict_stale(&mut self, path: &str) -> Option<Arc<ButtonAccessory<S>>> {
        let holder = self.routes.get(path)?;
        if self.accessories.get(holder)?.is_alive() {
            return None;
        }
        let holder = self.routes.remove(path)?;
        self.accessories.remove(&holder)
    }
}
