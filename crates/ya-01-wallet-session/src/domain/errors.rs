//! # Domain Errors
//!
//! Error types for the Wallet Session.

use shared_types::errors::CollaboratorError;
use thiserror::Error;

/// Wallet session error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The wallet could not report its authenticated account.
    #[error("Failed to query authenticated account: {0}")]
    AccountQuery(CollaboratorError),

    /// The key registry could not derive a key.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(CollaboratorError),

    /// Any other wallet call failed.
    #[error("Wallet error: {0}")]
    Wallet(CollaboratorError),
}

impl SessionError {
    /// Whether the user declined in their wallet.
    #[must_use]
    pub fn is_user_rejection(&self) -> bool {
        match self {
            Self::AccountQuery(e) | Self::KeyDerivation(e) | Self::Wallet(e) => {
                e.is_user_rejection()
            }
        }
    }
}
