//! # Publish Outcome

use serde::{Deserialize, Serialize};
use shared_types::entities::TxHash;

/// Result of a publication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    /// Whether the key is confirmed on-chain.
    pub success: bool,
    /// Attachment transaction, on success.
    pub tx_hash: Option<TxHash>,
}

impl PublishOutcome {
    /// Confirmed publication.
    pub fn confirmed(tx_hash: TxHash) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash),
        }
    }

    /// Failed publication.
    pub fn failed() -> Self {
        Self {
            success: false,
            tx_hash: None,
        }
    }
}
