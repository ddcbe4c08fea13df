//! Session signals published to the shared bus.

use crate::ports::SessionSignals;
use shared_bus::{InMemoryEventBus, SessionEvent};
use shared_types::entities::WalletAccount;
use std::sync::Arc;

/// Publishes `AccountUpdate` / `NetworkUpdate` on the session bus.
pub struct BusSignals {
    bus: Arc<InMemoryEventBus>,
}

impl BusSignals {
    /// Wrap a bus.
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }
}

impl SessionSignals for BusSignals {
    fn account_update(&self, account: Option<WalletAccount>) {
        self.bus.emit(SessionEvent::AccountUpdate(account));
    }

    fn network_update(&self, network: String) {
        self.bus.emit(SessionEvent::NetworkUpdate(network));
    }
}
