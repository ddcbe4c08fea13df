//! Password prompts through the interaction broker; notices and state
//! changes on the session bus.

use crate::ports::AuthInteraction;
use async_trait::async_trait;
use shared_bus::{InMemoryEventBus, InputKind, InputValue, InteractionBroker, Notice, SessionEvent};
use shared_types::entities::{Address, AuthorizationState};
use std::sync::Arc;
use tracing::warn;

/// Bus-backed [`AuthInteraction`].
pub struct BusAuthInteraction {
    bus: Arc<InMemoryEventBus>,
    broker: Arc<InteractionBroker>,
}

impl BusAuthInteraction {
    /// Create the adapter.
    pub fn new(bus: Arc<InMemoryEventBus>, broker: Arc<InteractionBroker>) -> Self {
        Self { bus, broker }
    }
}

#[async_trait]
impl AuthInteraction for BusAuthInteraction {
    async fn request_password(&self, address: &Address, retry: bool) -> Option<String> {
        let kind = InputKind::Password {
            address: address.clone(),
            retry,
        };
        match self.broker.request(kind).await? {
            InputValue::Password(password) => Some(password),
            other => {
                warn!(value = ?other, "Password prompt answered with a non-password value");
                None
            }
        }
    }

    fn notify(&self, notice: Notice) {
        self.bus.emit(SessionEvent::Notice(notice));
    }

    fn state_changed(
        &self,
        address: Option<&Address>,
        from: AuthorizationState,
        to: AuthorizationState,
    ) {
        self.bus.emit(SessionEvent::AuthorizationChanged {
            address: address.cloned(),
            from,
            to,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventFilter, EventTopic, InteractionConfig};

    fn setup() -> (Arc<InMemoryEventBus>, Arc<InteractionBroker>, BusAuthInteraction) {
        let bus = Arc::new(InMemoryEventBus::new());
        let broker = Arc::new(InteractionBroker::new(
            Arc::clone(&bus),
            InteractionConfig::for_testing(),
        ));
        let adapter = BusAuthInteraction::new(Arc::clone(&bus), Arc::clone(&broker));
        (bus, broker, adapter)
    }

    #[tokio::test]
    async fn test_password_prompt_round_trip() {
        let (bus, broker, adapter) = setup();
        let mut ui = bus.subscribe(EventFilter::topics(vec![EventTopic::Interaction]));

        let answer = tokio::spawn(async move {
            if let Some(SessionEvent::InteractionRequested { id, kind }) = ui.recv().await {
                assert!(matches!(kind, InputKind::Password { retry: true, .. }));
                broker.resolve(id, InputValue::Password("hunter2".into()));
            }
        });

        let password = adapter
            .request_password(&Address::new("0xaa"), true)
            .await;
        assert_eq!(password.as_deref(), Some("hunter2"));
        answer.await.unwrap();
    }

    #[test]
    fn test_state_change_emitted() {
        let (bus, _broker, adapter) = setup();
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Authorization]));

        adapter.state_changed(
            Some(&Address::new("0xaa")),
            AuthorizationState::Loading,
            AuthorizationState::NoRemoteKey,
        );

        assert_eq!(
            sub.drain(),
            vec![SessionEvent::AuthorizationChanged {
                address: Some(Address::new("0xaa")),
                from: AuthorizationState::Loading,
                to: AuthorizationState::NoRemoteKey,
            }]
        );
    }
}
