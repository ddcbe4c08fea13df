//! # Inbound Ports
//!
//! API trait defining what the Messaging service can do.

use crate::domain::MessagingError;
use async_trait::async_trait;
use shared_types::entities::{
    Address, Balance, DecryptedContent, MessageEnvelope, OutgoingContent, SendOutcome,
    WalletAccount,
};
use shared_types::networks::EvmNetwork;
use std::collections::BTreeMap;

/// Messaging API - inbound port.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Send direct mail on the active network.
    ///
    /// Requires an account, an active network and an `AUTHORIZED` session.
    async fn send_message(
        &self,
        recipients: Vec<Address>,
        content: OutgoingContent,
    ) -> Result<SendOutcome, MessagingError>;

    /// Broadcast to the sender's personal feed.
    ///
    /// Without an explicit network the user is asked to choose one.
    async fn broadcast_message(
        &self,
        content: OutgoingContent,
        network: Option<EvmNetwork>,
    ) -> Result<SendOutcome, MessagingError>;

    /// Fetch and decrypt a message. Unavailable or corrupted content shows
    /// a notice and yields `None`.
    async fn decode_message(
        &self,
        message: &MessageEnvelope,
        recipient: &WalletAccount,
    ) -> Option<DecryptedContent>;

    /// Native balance on every network that answered.
    async fn get_balances_of(&self, address: &Address) -> BTreeMap<EvmNetwork, Balance>;
}
