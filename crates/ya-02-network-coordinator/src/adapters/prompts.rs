//! Network prompts served by the shared interaction broker.

use crate::ports::NetworkPrompts;
use async_trait::async_trait;
use shared_bus::{InMemoryEventBus, InputKind, InputValue, InteractionBroker, Notice, SessionEvent};
use shared_types::networks::EvmNetwork;
use std::sync::Arc;
use tracing::warn;

/// Prompts through [`InteractionBroker`], notices on the bus.
pub struct BusPrompts {
    bus: Arc<InMemoryEventBus>,
    broker: Arc<InteractionBroker>,
}

impl BusPrompts {
    /// Create the adapter.
    pub fn new(bus: Arc<InMemoryEventBus>, broker: Arc<InteractionBroker>) -> Self {
        Self { bus, broker }
    }
}

#[async_trait]
impl NetworkPrompts for BusPrompts {
    async fn choose_network(&self) -> Option<EvmNetwork> {
        match self.broker.request(InputKind::NetworkChoice).await? {
            InputValue::Network(network) => Some(network),
            other => {
                warn!(value = ?other, "Network prompt answered with a non-network value");
                None
            }
        }
    }

    fn notify_error(&self, message: String) {
        self.bus.emit(SessionEvent::Notice(Notice::error(message)));
    }
}
