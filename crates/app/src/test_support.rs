//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use buttonhub_domain::accessory::{AccessoryContext, CachedAccessory};
use buttonhub_domain::error::{AccessoryError, BridgeError};
use buttonhub_domain::id::AccessoryId;
use buttonhub_domain::press::PressKind;

use crate::ports::{AccessoryCache, AccessoryFactory, SwitchService};

type PressLog = Arc<Mutex<Vec<(String, PressKind)>>>;

/// Switch that appends every press to a shared log.
pub struct RecordingSwitch {
    button: String,
    log: PressLog,
}

impl SwitchService for RecordingSwitch {
    fn trigger_event(
        &self,
        kind: PressKind,
    ) -> impl Future<Output = Result<(), AccessoryError>> + Send {
        self.log.lock().unwrap().push((self.button.clone(), kind));
        async { Ok(()) }
    }
}

/// Factory whose switches share one press log.
#[derive(Default)]
pub struct RecordingFactory {
    log: PressLog,
    setups: AtomicUsize,
}

impl RecordingFactory {
    pub fn presses(&self) -> Vec<(String, PressKind)> {
        self.log.lock().unwrap().clone()
    }

    pub fn setups(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }
}

impl AccessoryFactory for RecordingFactory {
    type Service = RecordingSwitch;

    fn setup(
        &self,
        _id: AccessoryId,
        context: &AccessoryContext,
    ) -> impl Future<Output = Result<RecordingSwitch, AccessoryError>> + Send {
        self.setups.fetch_add(1, Ordering::SeqCst);
        let switch = RecordingSwitch {
            button: context.button.clone(),
            log: Arc::clone(&self.log),
        };
        async { Ok(switch) }
    }
}

/// Factory whose setups block until permits are released with [`open`](Self::open).
pub struct GatedFactory {
    inner: RecordingFactory,
    gate: Arc<Semaphore>,
}

impl Default for GatedFactory {
    fn default() -> Self {
        Self {
            inner: RecordingFactory::default(),
            gate: Arc::new(Semaphore::new(0)),
        }
    }
}

impl GatedFactory {
    pub fn open(&self, setups: usize) {
        self.gate.add_permits(setups);
    }

    pub fn recording(&self) -> &RecordingFactory {
        &self.inner
    }
}

impl AccessoryFactory for GatedFactory {
    type Service = RecordingSwitch;

    async fn setup(
        &self,
        id: AccessoryId,
        context: &AccessoryContext,
    ) -> Result<RecordingSwitch, AccessoryError> {
        let permit = self.gate.acquire().await.unwrap();
        permit.forget();
        self.inner.setup(id, context).await
    }
}

/// Factory whose setups always fail.
pub struct FailingFactory;

impl AccessoryFactory for FailingFactory {
    type Service = RecordingSwitch;

    async fn setup(
        &self,
        _id: AccessoryId,
        context: &AccessoryContext,
    ) -> Result<RecordingSwitch, AccessoryError> {
        Err(AccessoryError::SetupFailed {
            button: context.button.clone(),
            reason: "host refused accessory".to_string(),
        })
    }
}

/// Accessory cache held in a map.
#[derive(Default, Clone)]
pub struct InMemoryCache {
    store: Arc<Mutex<HashMap<AccessoryId, CachedAccessory>>>,
}

impl InMemoryCache {
    pub fn with(entries: impl IntoIterator<Item = CachedAccessory>) -> Self {
        let cache = Self::default();
        {
            let mut store = cache.store.lock().unwrap();
            for entry in entries {
                store.insert(entry.id, entry);
            }
        }
        cache
    }

    pub fn snapshot(&self) -> HashMap<AccessoryId, CachedAccessory> {
        self.store.lock().unwrap().clone()
    }
}

impl AccessoryCache for InMemoryCache {
    fn load_all(&self) -> impl Future<Output = Result<Vec<CachedAccessory>, BridgeError>> + Send {
        let mut all: Vec<CachedAccessory> = self.store.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        async { Ok(all) }
    }

    fn save(
        &self,
        accessory: CachedAccessory,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        self.store.lock().unwrap().insert(accessory.id, accessory);
        async { Ok(()) }
    }

    fn remove(&self, id: AccessoryId) -> impl Future<Output = Result<(), BridgeError>> + Send {
        self.store.lock().unwrap().remove(&id);
        async { Ok(()) }
    }
}

/// A cached entry for `button` as this build would write it.
pub fn cached(button: &str) -> CachedAccessory {
    CachedAccessory::from_context(&AccessoryContext::new(button)).unwrap()
}

/// A cached entry written by some other plugin.
pub fn foreign(class_name: &str, button: &str) -> CachedAccessory {
    CachedAccessory {
        class_name: class_name.to_string(),
        ..cached(button)
    }
}
