//! # Domain Errors
//!
//! Error types for the Network Coordinator.

use shared_types::errors::CollaboratorError;
use shared_types::networks::EvmNetwork;
use thiserror::Error;

/// Network coordinator error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The wallet refused or failed `wallet_switchEthereumChain`.
    #[error("Failed to switch to {target}: {source}")]
    SwitchFailed {
        /// Requested network.
        target: EvmNetwork,
        /// Wallet failure.
        source: CollaboratorError,
    },
}
