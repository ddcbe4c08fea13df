//! # Authorization Configuration

use serde::{Deserialize, Serialize};
use shared_types::networks::EvmNetwork;
use std::time::Duration;

/// Authorization state machine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Network newly created passwordless keys are published to.
    pub publish_network: EvmNetwork,

    /// Wait after a publication before re-reading the remote key, in milliseconds.
    pub settle_delay_ms: u64,

    /// Treat the session as NOT_AUTHORIZED until an external identity is bound.
    pub require_identity: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            publish_network: EvmNetwork::Gnosis,
            settle_delay_ms: 3_000,
            require_identity: true,
        }
    }
}

impl AuthConfig {
    /// Create a config for testing (short settle delay, no identity gate).
    pub fn for_testing() -> Self {
        Self {
            publish_network: EvmNetwork::Gnosis,
            settle_delay_ms: 20,
            require_identity: false,
        }
    }

    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
