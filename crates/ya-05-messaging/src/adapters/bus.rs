//! Message writes and notices published to the shared bus.

use crate::ports::ActivitySink;
use shared_bus::{InMemoryEventBus, Notice, SessionEvent};
use shared_types::entities::TxHash;
use shared_types::networks::EvmNetwork;
use std::sync::Arc;

/// Emits `MessageSent` and `Notice` on the session bus.
pub struct BusActivity {
    bus: Arc<InMemoryEventBus>,
}

impl BusActivity {
    /// Wrap a bus.
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }
}

impl ActivitySink for BusActivity {
    fn message_sent(&self, network: EvmNetwork, broadcast: bool, tx_hash: &TxHash) {
        self.bus.emit(SessionEvent::MessageSent {
            network: network.name().to_string(),
            broadcast,
            tx_hash: tx_hash.clone(),
        });
    }

    fn notify(&self, notice: Notice) {
        self.bus.emit(SessionEvent::Notice(notice));
    }
}
