//! # Protocol Constants
//!
//! Process-wide messaging constants. These are fixed by the messaging
//! protocol deployment and are not user-configurable.

use primitive_types::H256;
use serde::{Deserialize, Serialize};

/// Logical channel identifier messages are tagged with.
pub type FeedId = H256;

/// Registrar identifier the faucet relay attributes publications to.
pub const FAUCET_REGISTRAR: u32 = 4;

/// Feed carrying direct mail.
pub const MAILING_FEED_ID: FeedId = H256([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0x02,
]);

/// Feed carrying personal broadcasts.
pub const UNIQUE_FEED_ID: FeedId = H256([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01,
    0x17,
]);

/// Service code attached to every message write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCode {
    /// Direct, encrypted mail.
    Mail,
    /// Personal broadcast.
    Broadcast,
}

impl ServiceCode {
    /// Numeric code written on-chain.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::Mail => 1,
            Self::Broadcast => 5,
        }
    }
}
