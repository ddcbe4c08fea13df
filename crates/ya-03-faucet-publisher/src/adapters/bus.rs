//! Publication results published to the shared bus.

use crate::ports::PublicationSink;
use shared_bus::{InMemoryEventBus, SessionEvent};
use shared_types::entities::Address;
use shared_types::networks::EvmNetwork;
use std::sync::Arc;

/// Emits `KeyPublished` on the session bus.
pub struct BusPublicationSink {
    bus: Arc<InMemoryEventBus>,
}

impl BusPublicationSink {
    /// Wrap a bus.
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }
}

impl PublicationSink for BusPublicationSink {
    fn published(&self, address: &Address, network: EvmNetwork, success: bool) {
        self.bus.emit(SessionEvent::KeyPublished {
            address: address.clone(),
            network: network.name().to_string(),
            success,
        });
    }
}
