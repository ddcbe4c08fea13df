//! # Domain Errors
//!
//! Precondition and write failures for message operations.

use shared_types::entities::AuthorizationState;
use shared_types::errors::CollaboratorError;
use shared_types::networks::EvmNetwork;
use thiserror::Error;

/// Messaging error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    /// No wallet account, or no active network to write to.
    #[error("No account")]
    NoAccount,

    /// The session does not hold a usable key.
    #[error("not authorized (state {state})")]
    NotAuthorized {
        /// State at call time.
        state: AuthorizationState,
    },

    /// The network prompt was cancelled.
    #[error("Network not selected")]
    NetworkNotSelected,

    /// The wallet could not be moved to the requested network.
    #[error("Could not switch to {network}")]
    SwitchFailed {
        /// Requested network.
        network: EvmNetwork,
    },

    /// The message core rejected the write.
    #[error("Message write failed: {0}")]
    Write(CollaboratorError),
}
