//! In-memory switch fakes and a helper that builds a ready registry.

use std::sync::{Arc, Mutex};

use buttonhub_app::ports::{AccessoryFactory, SwitchService};
use buttonhub_app::registry::Registry;
use buttonhub_domain::accessory::AccessoryContext;
use buttonhub_domain::error::AccessoryError;
use buttonhub_domain::id::AccessoryId;
use buttonhub_domain::press::PressKind;

type Presses = Arc<Mutex<Vec<(String, PressKind)>>>;

/// Records presses; rejects every trigger when `reject` is set.
pub struct FakeSwitch {
    button: String,
    reject: bool,
    presses: Presses,
}

impl SwitchService for FakeSwitch {
    async fn trigger_event(&self, kind: PressKind) -> Result<(), AccessoryError> {
        if self.reject {
            return Err(AccessoryError::TriggerRejected {
                button: self.button.clone(),
                reason: "switch offline".to_string(),
            });
        }
        self.presses
            .lock()
            .unwrap()
            .push((self.button.clone(), kind));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFactory {
    reject: bool,
    presses: Presses,
}

impl FakeFactory {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            presses: Presses::default(),
        }
    }

    pub fn presses(&self) -> Vec<(String, PressKind)> {
        self.presses.lock().unwrap().clone()
    }

    /// Poll until `count` presses were recorded, yielding to spawned triggers.
    pub async fn wait_for_presses(&self, count: usize) -> Vec<(String, PressKind)> {
        for _ in 0..100 {
            let presses = self.presses();
            if presses.len() >= count {
                return presses;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        self.presses()
    }
}

impl AccessoryFactory for FakeFactory {
    type Service = FakeSwitch;

    async fn setup(
        &self,
        _id: AccessoryId,
        context: &AccessoryContext,
    ) -> Result<FakeSwitch, AccessoryError> {
        Ok(FakeSwitch {
            button: context.button.clone(),
            reject: self.reject,
            presses: Arc::clone(&self.presses),
        })
    }
}

/// A registry with `buttons` created and initialised through `factory`.
pub async fn ready_registry(
    factory: &FakeFactory,
    buttons: &[&str],
) -> Arc<Registry<FakeSwitch>> {
    let mut registry = Registry::new();
    let reconciled = registry.reconcile(buttons).unwrap();
    for accessory in &reconciled.created {
        accessory.initialise(factory).await.unwrap();
    }
    Arc::new(registry)
}
