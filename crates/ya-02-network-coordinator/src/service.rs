//! # Network Coordinator Service
//!
//! Tracks the wallet's active network and moves it on request.
//!
//! The active network has two writers: the initial query made when the
//! wallet attaches, and every `networkUpdate` signal afterwards. A
//! successful switch also sets it optimistically, before the wallet's own
//! `BlockchainChanged` event arrives.

use crate::domain::{wrong_network_message, NetworkError, ADD_CHAIN_METHOD, SWITCH_CHAIN_METHOD};
use crate::ports::{NetworkCoordinatorApi, NetworkPrompts};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::collaborators::WalletController;
use shared_types::networks::EvmNetwork;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Network Coordinator - active network and chain switching.
pub struct NetworkCoordinator {
    controller: Arc<dyn WalletController>,
    prompts: Arc<dyn NetworkPrompts>,
    active: RwLock<Option<EvmNetwork>>,
}

impl NetworkCoordinator {
    /// Create a coordinator with no active network.
    pub fn new(controller: Arc<dyn WalletController>, prompts: Arc<dyn NetworkPrompts>) -> Self {
        Self {
            controller,
            prompts,
            active: RwLock::new(None),
        }
    }

    /// Initial query at wallet-attach time. Failures leave no active network.
    pub async fn attach(&self) -> Option<EvmNetwork> {
        match self.controller.get_current_blockchain().await {
            Ok(name) => self.handle_network_update(&name),
            Err(e) => {
                warn!(error = %e, "Initial network query failed");
                self.set_active_network(None);
            }
        }
        self.active_network()
    }
}

#[async_trait]
impl NetworkCoordinatorApi for NetworkCoordinator {
    fn active_network(&self) -> Option<EvmNetwork> {
        *self.active.read()
    }

    fn set_active_network(&self, network: Option<EvmNetwork>) {
        let previous = std::mem::replace(&mut *self.active.write(), network);
        if previous != network {
            info!(from = ?previous, to = ?network, "Active network changed");
        }
    }

    fn handle_network_update(&self, name_or_id: &str) {
        let network = EvmNetwork::from_name(name_or_id);
        if network.is_none() {
            debug!(reported = name_or_id, "Wallet is on an unsupported network");
        }
        self.set_active_network(network);
    }

    async fn request_network_switch(&self, target: EvmNetwork) -> Result<(), NetworkError> {
        if self.active_network() == Some(target) {
            debug!(network = %target, "Already on requested network");
            return Ok(());
        }

        if let Err(e) = self
            .controller
            .provider_request(ADD_CHAIN_METHOD, target.add_chain_params())
            .await
        {
            debug!(network = %target, error = %e, "Add chain request failed, continuing");
        }

        self.controller
            .provider_request(SWITCH_CHAIN_METHOD, target.switch_chain_params())
            .await
            .map_err(|source| NetworkError::SwitchFailed { target, source })?;

        self.set_active_network(Some(target));
        Ok(())
    }

    async fn prompt_network_choice(&self) -> Option<EvmNetwork> {
        let choice = self.prompts.choose_network().await?;
        if self.active_network() != Some(choice) {
            if let Err(e) = self.request_network_switch(choice).await {
                warn!(error = %e, "Switch to chosen network failed");
                self.prompts
                    .notify_error(wrong_network_message(self.active_network(), choice));
                return None;
            }
        }
        Some(choice)
    }

    async fn handle_switch_request(
        &self,
        reason: &str,
        current: Option<EvmNetwork>,
        needed: EvmNetwork,
    ) -> bool {
        debug!(reason, current = ?current, needed = %needed, "Wallet requested network switch");
        match self.request_network_switch(needed).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Wallet-requested switch failed");
                self.prompts
                    .notify_error(wrong_network_message(current, needed));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ScriptedPrompts;
    use shared_types::sandbox::{SandboxLedger, SandboxWallet};

    fn setup(chain: &str) -> (Arc<SandboxWallet>, Arc<ScriptedPrompts>, NetworkCoordinator) {
        let wallet = SandboxWallet::new([3u8; 32], chain, SandboxLedger::new());
        let prompts = Arc::new(ScriptedPrompts::default());
        let coordinator = NetworkCoordinator::new(wallet.clone(), prompts.clone());
        (wallet, prompts, coordinator)
    }

    #[tokio::test]
    async fn test_attach_resolves_chain_id() {
        let (_wallet, _prompts, coordinator) = setup("0x89");
        assert_eq!(coordinator.attach().await, Some(EvmNetwork::Polygon));
    }

    #[tokio::test]
    async fn test_attach_failure_leaves_none() {
        let (wallet, _prompts, coordinator) = setup("GNOSIS");
        wallet.set_fail_blockchain_query(true);
        assert_eq!(coordinator.attach().await, None);
    }

    #[tokio::test]
    async fn test_switch_noop_when_already_there() {
        let (wallet, _prompts, coordinator) = setup("GNOSIS");
        coordinator.attach().await;

        coordinator
            .request_network_switch(EvmNetwork::Gnosis)
            .await
            .unwrap();
        assert!(wallet.provider_requests().is_empty());
    }

    #[tokio::test]
    async fn test_switch_issues_add_then_switch() {
        let (wallet, _prompts, coordinator) = setup("GNOSIS");
        coordinator.attach().await;
        wallet.set_reject_add_chain(true);

        coordinator
            .request_network_switch(EvmNetwork::Fantom)
            .await
            .unwrap();

        let methods: Vec<String> = wallet
            .provider_requests()
            .into_iter()
            .map(|(m, _)| m)
            .collect();
        assert_eq!(methods, vec![ADD_CHAIN_METHOD, SWITCH_CHAIN_METHOD]);
        assert_eq!(coordinator.active_network(), Some(EvmNetwork::Fantom));
    }

    #[tokio::test]
    async fn test_switch_failure_propagates() {
        let (wallet, _prompts, coordinator) = setup("GNOSIS");
        coordinator.attach().await;
        wallet.set_reject_switch(true);

        let result = coordinator.request_network_switch(EvmNetwork::Fantom).await;
        assert!(matches!(
            result,
            Err(NetworkError::SwitchFailed {
                target: EvmNetwork::Fantom,
                ..
            })
        ));
        assert_eq!(coordinator.active_network(), Some(EvmNetwork::Gnosis));
    }

    #[tokio::test]
    async fn test_prompt_switches_to_choice() {
        let (_wallet, prompts, coordinator) = setup("GNOSIS");
        coordinator.attach().await;
        prompts.push_choice(Some(EvmNetwork::Polygon));

        assert_eq!(
            coordinator.prompt_network_choice().await,
            Some(EvmNetwork::Polygon)
        );
        assert_eq!(coordinator.active_network(), Some(EvmNetwork::Polygon));
    }

    #[tokio::test]
    async fn test_prompt_cancelled() {
        let (wallet, prompts, coordinator) = setup("GNOSIS");
        prompts.push_choice(None);

        assert_eq!(coordinator.prompt_network_choice().await, None);
        assert!(wallet.provider_requests().is_empty());
    }

    #[tokio::test]
    async fn test_switch_request_failure_becomes_notice() {
        let (wallet, prompts, coordinator) = setup("ETHEREUM");
        coordinator.attach().await;
        wallet.set_reject_switch(true);

        let switched = coordinator
            .handle_switch_request("publish", Some(EvmNetwork::Ethereum), EvmNetwork::Gnosis)
            .await;
        assert!(!switched);
        assert_eq!(
            prompts.errors(),
            vec!["Wrong network (ETHEREUM), switch to GNOSIS".to_string()]
        );
    }

    #[test]
    fn test_network_update_unknown_clears() {
        let (_wallet, _prompts, coordinator) = setup("GNOSIS");
        coordinator.handle_network_update("CELO");
        assert_eq!(coordinator.active_network(), Some(EvmNetwork::Celo));
        coordinator.handle_network_update("unknown");
        assert_eq!(coordinator.active_network(), None);
    }
}
