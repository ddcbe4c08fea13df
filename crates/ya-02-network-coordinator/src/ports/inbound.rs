//! # Inbound Ports
//!
//! API trait defining what the Network Coordinator can do.

use crate::domain::NetworkError;
use async_trait::async_trait;
use shared_types::networks::EvmNetwork;

/// Network Coordinator API - inbound port.
#[async_trait]
pub trait NetworkCoordinatorApi: Send + Sync {
    /// Network the wallet is on, if it is a supported one.
    fn active_network(&self) -> Option<EvmNetwork>;

    /// Override the active network.
    fn set_active_network(&self, network: Option<EvmNetwork>);

    /// Apply a `networkUpdate` signal (chain name or id as reported).
    fn handle_network_update(&self, name_or_id: &str);

    /// Move the wallet to `target`. Resolves immediately if already there.
    async fn request_network_switch(&self, target: EvmNetwork) -> Result<(), NetworkError>;

    /// Ask the user to pick a network. `None` when cancelled.
    async fn prompt_network_choice(&self) -> Option<EvmNetwork>;

    /// Wallet callback for "this operation needs another network".
    ///
    /// Returns whether the switch happened; failures become a notice.
    async fn handle_switch_request(
        &self,
        reason: &str,
        current: Option<EvmNetwork>,
        needed: EvmNetwork,
    ) -> bool;
}
