//! # Inbound Ports

use crate::domain::PublishOutcome;
use async_trait::async_trait;
use shared_types::entities::{PublicKey, WalletAccount};
use shared_types::networks::EvmNetwork;

/// Key Publisher API - inbound port.
#[async_trait]
pub trait KeyPublisher: Send + Sync {
    /// Publish `public_key` for `account` on `network` through the faucet
    /// relay and wait for it to land. Never fails; see [`PublishOutcome`].
    async fn publish(
        &self,
        account: &WalletAccount,
        public_key: &PublicKey,
        network: EvmNetwork,
    ) -> PublishOutcome;
}
