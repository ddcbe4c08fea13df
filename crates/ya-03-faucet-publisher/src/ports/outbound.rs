//! # Outbound Ports

use parking_lot::Mutex;
use shared_types::entities::Address;
use shared_types::networks::EvmNetwork;

/// Receives the result of every publication - outbound port.
pub trait PublicationSink: Send + Sync {
    /// A publication attempt finished.
    fn published(&self, address: &Address, network: EvmNetwork, success: bool);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl PublicationSink for NoOpSink {
    fn published(&self, _address: &Address, _network: EvmNetwork, _success: bool) {}
}

/// Sink that records every result, for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    results: Mutex<Vec<(Address, EvmNetwork, bool)>>,
}

impl RecordingSink {
    /// Results recorded so far.
    pub fn results(&self) -> Vec<(Address, EvmNetwork, bool)> {
        self.results.lock().clone()
    }
}

impl PublicationSink for RecordingSink {
    fn published(&self, address: &Address, network: EvmNetwork, success: bool) {
        self.results.lock().push((address.clone(), network, success));
    }
}
