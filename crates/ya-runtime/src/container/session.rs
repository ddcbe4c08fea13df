//! # Session Container
//!
//! Holds every component instance of one wallet session, wired through
//! the port adapters and sharing one event bus and prompt broker.
//!
//! ## Construction Order
//!
//! ```text
//! bus, broker
//!   └─→ WalletSession (ya-01)          signals → bus
//!   └─→ NetworkCoordinator (ya-02)     prompts → broker
//!   └─→ FaucetPublisher (ya-03)        results → bus
//!         └─→ AuthorizationStateMachine (ya-04)
//!               KeySource      → WalletSession
//!               KeyPublication → FaucetPublisher
//!               └─→ MessagingService (ya-05)
//!                     MessagingContext → auth + coordinator
//! ```

use std::sync::Arc;

use shared_bus::{InMemoryEventBus, InteractionBroker};
use shared_types::collaborators::{BlockchainController, KeyRegistry, MessageCore, WalletController, WalletFactory};
use shared_types::sandbox::{InMemoryKeyRegistry, SandboxLedger, SandboxMessageCore, SandboxWallet};
use ya_01_wallet_session::{BusSignals, WalletSession};
use ya_02_network_coordinator::{BusPrompts, NetworkCoordinator};
use ya_03_faucet_publisher::{BusPublicationSink, FaucetPublisher};
use ya_04_authorization::{AuthorizationStateMachine, BusAuthInteraction};
use ya_05_messaging::{BusActivity, MessagingService};

use crate::adapters::{FaucetKeyPublication, SessionKeySource, SessionMessagingContext};
use crate::container::config::ServiceConfig;

/// External collaborators a session is built on.
pub struct Collaborators {
    /// Wallet availability and identity.
    pub factory: Arc<dyn WalletFactory>,
    /// The connected wallet.
    pub controller: Arc<dyn WalletController>,
    /// Local key store.
    pub registry: Arc<dyn KeyRegistry>,
    /// One controller per supported network.
    pub chains: Vec<Arc<dyn BlockchainController>>,
    /// Message encryption and writes.
    pub message_core: Arc<dyn MessageCore>,
}

/// Handles on the in-memory collaborators behind a sandbox container.
pub struct SandboxHandles {
    /// Chain state shared by every sandbox collaborator.
    pub ledger: Arc<SandboxLedger>,
    /// Wallet acting as factory and controller.
    pub wallet: Arc<SandboxWallet>,
    /// Key store.
    pub registry: Arc<InMemoryKeyRegistry>,
    /// Message core.
    pub message_core: Arc<SandboxMessageCore>,
}

impl SandboxHandles {
    /// Fresh sandbox collaborators with the wallet on `blockchain`.
    pub fn new(seed: [u8; 32], blockchain: &str) -> Self {
        let ledger = SandboxLedger::new();
        Self {
            wallet: SandboxWallet::new(seed, blockchain, Arc::clone(&ledger)),
            registry: InMemoryKeyRegistry::new(),
            message_core: SandboxMessageCore::new(Arc::clone(&ledger)),
            ledger,
        }
    }

    /// The handles as collaborator trait objects.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            factory: self.wallet.clone(),
            controller: self.wallet.clone(),
            registry: self.registry.clone(),
            chains: self.ledger.controllers(),
            message_core: self.message_core.clone(),
        }
    }
}

/// Container for all component instances of a session.
pub struct SessionContainer {
    /// Session event bus.
    pub bus: Arc<InMemoryEventBus>,
    /// Prompt broker answered by the UI layer.
    pub broker: Arc<InteractionBroker>,
    /// Wallet session (ya-01).
    pub session: Arc<WalletSession>,
    /// Network coordinator (ya-02).
    pub coordinator: Arc<NetworkCoordinator>,
    /// Faucet publisher (ya-03).
    pub publisher: Arc<FaucetPublisher>,
    /// Authorization state machine (ya-04).
    pub auth: Arc<AuthorizationStateMachine>,
    /// Messaging service (ya-05).
    pub messaging: Arc<MessagingService>,
    /// Configuration the container was built with.
    pub config: ServiceConfig,
}

impl SessionContainer {
    /// Build and wire every component.
    pub fn new(collaborators: Collaborators, config: ServiceConfig) -> Self {
        let Collaborators {
            factory,
            controller,
            registry,
            chains,
            message_core,
        } = collaborators;

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));
        let broker = Arc::new(InteractionBroker::new(
            Arc::clone(&bus),
            config.interaction.clone(),
        ));

        let session = Arc::new(WalletSession::new(
            factory,
            Arc::clone(&controller),
            Arc::clone(&registry),
            chains.clone(),
            Arc::new(BusSignals::new(Arc::clone(&bus))),
        ));

        let coordinator = Arc::new(NetworkCoordinator::new(
            Arc::clone(&controller),
            Arc::new(BusPrompts::new(Arc::clone(&bus), Arc::clone(&broker))),
        ));

        let publisher = Arc::new(FaucetPublisher::new(
            Arc::clone(&controller),
            Arc::clone(&registry),
            &chains,
            Arc::new(BusPublicationSink::new(Arc::clone(&bus))),
            config.faucet.clone(),
        ));

        let auth = Arc::new(AuthorizationStateMachine::new(
            Arc::new(SessionKeySource::new(Arc::clone(&session))),
            Arc::new(FaucetKeyPublication::new(Arc::clone(&publisher))),
            registry,
            Arc::new(BusAuthInteraction::new(Arc::clone(&bus), Arc::clone(&broker))),
            config.auth.clone(),
        ));

        let messaging = Arc::new(MessagingService::new(
            controller,
            message_core,
            chains,
            Arc::new(SessionMessagingContext::new(
                Arc::clone(&auth),
                Arc::clone(&coordinator),
            )),
            Arc::new(BusActivity::new(Arc::clone(&bus))),
        ));

        Self {
            bus,
            broker,
            session,
            coordinator,
            publisher,
            auth,
            messaging,
            config,
        }
    }

    /// Build a container over fresh sandbox collaborators.
    pub fn sandbox(config: ServiceConfig, seed: [u8; 32]) -> (Self, SandboxHandles) {
        let handles = SandboxHandles::new(seed, config.auth.publish_network.name());
        let container = Self::new(handles.collaborators(), config);
        (container, handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::entities::AuthorizationState;
    use ya_04_authorization::AuthorizationApi;

    #[test]
    fn test_sandbox_container_starts_loading() {
        let (container, handles) = SessionContainer::sandbox(ServiceConfig::for_testing(), [1; 32]);

        assert_eq!(
            container.auth.get_authorization_state(),
            AuthorizationState::Loading
        );
        assert_eq!(container.bus.capacity(), container.config.bus_capacity);
        assert_eq!(handles.wallet.listener_count(), 0);
    }
}
