//! # Outbound Ports
//!
//! Where the session sends its normalized signals.

use parking_lot::Mutex;
use shared_types::entities::WalletAccount;

/// Receiver of normalized wallet signals - outbound port.
///
/// Called synchronously from wallet listeners; implementations must not block.
pub trait SessionSignals: Send + Sync {
    /// Account changed, logged in or logged out.
    fn account_update(&self, account: Option<WalletAccount>);

    /// Wallet switched chains.
    fn network_update(&self, network: String);
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// A signal captured by [`RecordingSignals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedSignal {
    /// `account_update`
    Account(Option<WalletAccount>),
    /// `network_update`
    Network(String),
}

/// Signals sink that records everything, for tests.
#[derive(Debug, Default)]
pub struct RecordingSignals {
    signals: Mutex<Vec<RecordedSignal>>,
}

impl RecordingSignals {
    /// Signals received so far.
    pub fn take(&self) -> Vec<RecordedSignal> {
        std::mem::take(&mut *self.signals.lock())
    }
}

impl SessionSignals for RecordingSignals {
    fn account_update(&self, account: Option<WalletAccount>) {
        self.signals.lock().push(RecordedSignal::Account(account));
    }

    fn network_update(&self, network: String) {
        self.signals.lock().push(RecordedSignal::Network(network));
    }
}
