//! # buttonhub-adapter-virtual
//!
//! Virtual accessory model: every button becomes a stateless programmable
//! switch whose presses are published to the host event bus.
//!
//! ## Provided services
//!
//! | Service | Behaviour |
//! |---------|-----------|
//! | [`ProgrammableSwitch`] | Records the last press kind, publishes a `PressEvent` |
//!
//! ## Dependency rule
//!
//! Depends on `buttonhub-app` (port traits) and `buttonhub-domain` only.

mod devices;

use std::future::Future;

use buttonhub_app::ports::{AccessoryFactory, EventPublisher};
use buttonhub_domain::accessory::AccessoryContext;
use buttonhub_domain::error::AccessoryError;
use buttonhub_domain::id::AccessoryId;

pub use devices::{AccessoryInformation, ProgrammableSwitch};

/// Builds a [`ProgrammableSwitch`] for each button, all sharing one publisher.
pub struct VirtualButtonFactory<P> {
    publisher: P,
}

impl<P> VirtualButtonFactory<P> {
    /// Create a factory whose switches publish through `publisher`.
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }
}

impl<P> AccessoryFactory for VirtualButtonFactory<P>
where
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    type Service = ProgrammableSwitch<P>;

    fn setup(
        &self,
        id: AccessoryId,
        context: &AccessoryContext,
    ) -> impl Future<Output = Result<ProgrammableSwitch<P>, AccessoryError>> + Send {
        let switch = ProgrammableSwitch::new(id, &context.button, self.publisher.clone());
        tracing::debug!(
            button = %context.button,
            serial = %switch.info().serial_number,
            "virtual switch ready"
        );
        async { Ok(switch) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use buttonhub_app::event_bus::InProcessEventBus;
    use buttonhub_app::ports::SwitchService;
    use buttonhub_domain::press::PressKind;

    fn factory() -> (VirtualButtonFactory<Arc<InProcessEventBus>>, Arc<InProcessEventBus>) {
        let bus = Arc::new(InProcessEventBus::new(16));
        (VirtualButtonFactory::new(Arc::clone(&bus)), bus)
    }

    #[tokio::test]
    async fn should_build_switch_named_after_button() {
        let (factory, _bus) = factory();
        let id = AccessoryId::for_button("Kitchen");

        let switch = factory
            .setup(id, &AccessoryContext::new("Kitchen"))
            .await
            .unwrap();

        assert_eq!(switch.info().name, "Kitchen");
        assert_eq!(switch.info().serial_number, id.to_string());
        assert_eq!(switch.last_event(), None);
    }

    #[tokio::test]
    async fn should_publish_presses_of_every_switch_on_shared_bus() {
        let (factory, bus) = factory();
        let mut rx = bus.subscribe();
        let kitchen = factory
            .setup(AccessoryId::for_button("Kitchen"), &AccessoryContext::new("Kitchen"))
            .await
            .unwrap();
        let hall = factory
            .setup(AccessoryId::for_button("Hall"), &AccessoryContext::new("Hall"))
            .await
            .unwrap();

        kitchen.trigger_event(PressKind::Single).await.unwrap();
        hall.trigger_event(PressKind::Long).await.unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!((first.button.as_str(), first.kind), ("Kitchen", PressKind::Single));
        assert_eq!((second.button.as_str(), second.kind), ("Hall", PressKind::Long));
    }

    #[tokio::test]
    async fn should_reach_button_subscription_only_from_its_own_switch() {
        let (factory, bus) = factory();
        let mut hall_only = bus.subscribe_button("Hall");
        let kitchen = factory
            .setup(AccessoryId::for_button("Kitchen"), &AccessoryContext::new("Kitchen"))
            .await
            .unwrap();
        let hall = factory
            .setup(AccessoryId::for_button("Hall"), &AccessoryContext::new("Hall"))
            .await
            .unwrap();

        kitchen.trigger_event(PressKind::Double).await.unwrap();
        hall.trigger_event(PressKind::Single).await.unwrap();

        let event = hall_only.recv().await.unwrap();
        assert_eq!(event.accessory_id, AccessoryId::for_button("Hall"));
        assert_eq!(event.kind, PressKind::Single);
        assert!(hall_only.try_next().is_none());
    }
}
