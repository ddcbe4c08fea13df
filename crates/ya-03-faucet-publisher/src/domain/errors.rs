//! # Domain Errors
//!
//! Failures inside one publication attempt. They never leave the
//! publisher: every one of them is logged and reported as an
//! unsuccessful [`PublishOutcome`](super::PublishOutcome).

use shared_types::errors::CollaboratorError;
use shared_types::networks::EvmNetwork;
use thiserror::Error;

/// Publication step failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The wallet has no faucet for the network.
    #[error("No faucet for {network}: {source}")]
    FaucetUnavailable {
        /// Requested network.
        network: EvmNetwork,
        /// Wallet failure.
        source: CollaboratorError,
    },

    /// The relay refused to sign an allowance.
    #[error("Publishing authorization failed: {0}")]
    Authorization(CollaboratorError),

    /// The attachment transaction failed.
    #[error("Key attachment failed: {0}")]
    Attach(CollaboratorError),

    /// No blockchain controller is registered for the network.
    #[error("No blockchain controller for {0}")]
    NoChain(EvmNetwork),

    /// The key never became resolvable on-chain.
    #[error("Key not confirmed on {network} after {waited_secs}s")]
    ConfirmationTimeout {
        /// Network polled.
        network: EvmNetwork,
        /// Seconds waited.
        waited_secs: u64,
    },

    /// The key registry rejected the confirmed key.
    #[error("Failed to cache remote key: {0}")]
    Registry(CollaboratorError),
}
