//! # Faucet Publisher Configuration

use serde::{Deserialize, Serialize};
use shared_types::protocol::FAUCET_REGISTRAR;
use std::time::Duration;

/// Faucet publisher configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// Registrar the relay attributes publications to.
    pub registrar: u32,

    /// Delay between on-chain confirmation polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Give up waiting for the key to appear after this many seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            registrar: FAUCET_REGISTRAR,
            poll_interval_ms: 1_000,
            confirmation_timeout_secs: 60,
        }
    }
}

impl FaucetConfig {
    /// Create a config for testing (fast polling, short timeout).
    pub fn for_testing() -> Self {
        Self {
            registrar: FAUCET_REGISTRAR,
            poll_interval_ms: 10,
            confirmation_timeout_secs: 1,
        }
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Confirmation timeout as a duration.
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}
