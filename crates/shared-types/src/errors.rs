//! # Error Types
//!
//! Defines the error type every external collaborator reports.

use thiserror::Error;

/// Failure reported by a wallet, chain, key registry or message core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// RPC or network failure talking to a chain or relay.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The user rejected the request in the wallet.
    #[error("Request rejected by user: {0}")]
    Rejected(String),

    /// The requested capability is not available.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// The requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The collaborator returned data that could not be used.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CollaboratorError {
    /// Whether the failure came from the user declining in their wallet.
    #[must_use]
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
