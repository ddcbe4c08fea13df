//! # Domain Errors
//!
//! Error types for the Authorization State Machine.

use shared_types::errors::CollaboratorError;
use shared_types::networks::EvmNetwork;
use thiserror::Error;

/// Authorization error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No wallet account is bound.
    #[error("No account")]
    NoAccount,

    /// The selected key version needs a password and none was supplied.
    #[error("Password required for this key version")]
    PasswordRequired,

    /// The key registry or wallet could not derive a key.
    #[error("Key creation failed: {0}")]
    KeyCreation(CollaboratorError),

    /// The key registry rejected a write.
    #[error("Key registry error: {0}")]
    Registry(CollaboratorError),

    /// The faucet publication did not land.
    #[error("Key publication on {network} failed")]
    PublicationFailed {
        /// Target network.
        network: EvmNetwork,
    },

    /// The account changed while the flow was in flight.
    #[error("Superseded by a newer account update")]
    Superseded,
}
