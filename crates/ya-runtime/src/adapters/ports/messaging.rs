//! # Messaging Port Adapters
//!
//! Implements the `MessagingContext` port of ya-05-messaging from the
//! authorization state machine (account, state) and the network
//! coordinator (active network, choice prompt, switching).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use shared_types::entities::{AuthorizationState, WalletAccount};
use shared_types::networks::EvmNetwork;
use ya_02_network_coordinator::{NetworkCoordinator, NetworkCoordinatorApi};
use ya_04_authorization::{AuthorizationApi, AuthorizationStateMachine};
use ya_05_messaging::MessagingContext;

/// Adapter implementing ya-05's MessagingContext trait.
pub struct SessionMessagingContext {
    auth: Arc<AuthorizationStateMachine>,
    coordinator: Arc<NetworkCoordinator>,
}

impl SessionMessagingContext {
    /// Create the context.
    pub fn new(auth: Arc<AuthorizationStateMachine>, coordinator: Arc<NetworkCoordinator>) -> Self {
        Self { auth, coordinator }
    }
}

#[async_trait]
impl MessagingContext for SessionMessagingContext {
    fn account(&self) -> Option<WalletAccount> {
        self.auth.wallet_account()
    }

    fn active_network(&self) -> Option<EvmNetwork> {
        self.coordinator.active_network()
    }

    fn authorization_state(&self) -> AuthorizationState {
        self.auth.get_authorization_state()
    }

    async fn choose_network(&self) -> Option<EvmNetwork> {
        self.coordinator.prompt_network_choice().await
    }

    async fn switch_network(&self, network: EvmNetwork) -> bool {
        match self.coordinator.request_network_switch(network).await {
            Ok(()) => true,
            Err(e) => {
                warn!(network = %network, error = %e, "Network switch for messaging failed");
                false
            }
        }
    }
}
