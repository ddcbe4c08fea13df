//! # Wallet Session Service
//!
//! Wraps one wallet controller: attaches and detaches its listeners,
//! folds its four event kinds into `account_update` / `network_update`
//! signals, and fronts key derivation and remote key lookup for the
//! account it is bound to.

use crate::domain::{latest_key, RemoteKeySnapshot, SessionError};
use crate::ports::{SessionSignals, SessionSnapshot, WalletSessionApi};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::collaborators::{
    BlockchainController, KeyDerivationHandler, KeyRegistry, ListenerId, WalletController,
    WalletEvent, WalletEventKind, WalletFactory, WalletListener,
};
use shared_types::entities::{
    Address, KeyVersion, LocalPrivateKey, PrivateKeyAvailability, WalletAccount,
};
use shared_types::errors::CollaboratorError;
use shared_types::networks::UNKNOWN_BLOCKCHAIN;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct SessionState {
    available: bool,
    account: Option<WalletAccount>,
    network: String,
    listeners: Vec<(WalletEventKind, ListenerId)>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            available: false,
            account: None,
            network: UNKNOWN_BLOCKCHAIN.to_string(),
            listeners: Vec::new(),
        }
    }
}

/// Wallet Session - owns one wallet controller's lifecycle.
pub struct WalletSession {
    factory: Arc<dyn WalletFactory>,
    controller: Arc<dyn WalletController>,
    registry: Arc<dyn KeyRegistry>,
    chains: Vec<Arc<dyn BlockchainController>>,
    signals: Arc<dyn SessionSignals>,
    state: Arc<RwLock<SessionState>>,
}

impl WalletSession {
    /// Create a session. Nothing is queried until [`WalletSessionApi::initialize`].
    pub fn new(
        factory: Arc<dyn WalletFactory>,
        controller: Arc<dyn WalletController>,
        registry: Arc<dyn KeyRegistry>,
        chains: Vec<Arc<dyn BlockchainController>>,
        signals: Arc<dyn SessionSignals>,
    ) -> Self {
        Self {
            factory,
            controller,
            registry,
            chains,
            signals,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Wallet controller this session wraps.
    #[must_use]
    pub fn controller(&self) -> Arc<dyn WalletController> {
        Arc::clone(&self.controller)
    }

    /// Blockchain controllers, one per network.
    #[must_use]
    pub fn chains(&self) -> &[Arc<dyn BlockchainController>] {
        &self.chains
    }

    /// Whether the wallet provider reported itself available at attach time.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state.read().available
    }

    /// Whether listeners are currently attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.state.read().listeners.is_empty()
    }

    fn listener_for(&self) -> WalletListener {
        let state = Arc::clone(&self.state);
        let signals = Arc::clone(&self.signals);
        Arc::new(move |event: WalletEvent| on_wallet_event(&state, signals.as_ref(), event))
    }

    fn attach_listeners(&self) {
        if self.is_attached() {
            debug!("Wallet listeners already attached");
            return;
        }
        let listeners: Vec<(WalletEventKind, ListenerId)> = WalletEventKind::ALL
            .iter()
            .map(|kind| (*kind, self.controller.subscribe(*kind, self.listener_for())))
            .collect();
        self.state.write().listeners = listeners;
    }
}

fn on_wallet_event(state: &RwLock<SessionState>, signals: &dyn SessionSignals, event: WalletEvent) {
    match event {
        WalletEvent::AccountChanged(account) | WalletEvent::Login(account) => {
            debug!(address = %account.address, "Wallet account update");
            state.write().account = Some(account.clone());
            signals.account_update(Some(account));
        }
        WalletEvent::Logout => {
            debug!("Wallet logout");
            state.write().account = None;
            signals.account_update(None);
        }
        WalletEvent::BlockchainChanged(network) => {
            debug!(network = %network, "Wallet network update");
            state.write().network = network.clone();
            signals.network_update(network);
        }
    }
}

/// Key derivation callbacks backed by the session's wallet.
struct WalletDerivationHandler<'a> {
    controller: &'a dyn WalletController,
    account: &'a WalletAccount,
    password: Option<String>,
}

#[async_trait]
impl KeyDerivationHandler for WalletDerivationHandler<'_> {
    async fn on_private_key_request(
        &self,
        address: &Address,
        magic_string: &str,
    ) -> Result<Vec<u8>, CollaboratorError> {
        debug!(address = %address, "Requesting wallet signature for key derivation");
        self.controller
            .sign_magic_string(self.account, magic_string)
            .await
    }

    async fn on_password_request(&self, _address: &Address) -> Option<String> {
        self.password.clone()
    }
}

#[async_trait]
impl WalletSessionApi for WalletSession {
    async fn initialize(&self) -> Result<SessionSnapshot, SessionError> {
        let available = self.factory.is_wallet_available().await;

        let network = match self.controller.get_current_blockchain().await {
            Ok(network) => network,
            Err(e) => {
                warn!(error = %e, "Current network query failed, using unknown");
                UNKNOWN_BLOCKCHAIN.to_string()
            }
        };

        let account = self
            .controller
            .get_authenticated_account()
            .await
            .map_err(SessionError::AccountQuery)?;

        {
            let mut state = self.state.write();
            state.available = available;
            state.account = account.clone();
            state.network = network.clone();
        }
        self.attach_listeners();

        info!(
            wallet = self.factory.wallet(),
            available,
            network = %network,
            address = ?account.as_ref().map(|a| a.address.to_string()),
            "Wallet session initialized"
        );

        Ok(SessionSnapshot {
            available,
            account,
            network,
        })
    }

    fn teardown(&self) {
        let listeners = std::mem::take(&mut self.state.write().listeners);
        for (kind, id) in &listeners {
            if !self.controller.unsubscribe(*kind, *id) {
                debug!(kind = ?kind, id, "Listener already removed");
            }
        }
        if !listeners.is_empty() {
            info!(removed = listeners.len(), "Wallet session torn down");
        }
    }

    fn current_account(&self) -> Option<WalletAccount> {
        self.state.read().account.clone()
    }

    fn current_network(&self) -> String {
        self.state.read().network.clone()
    }

    async fn connect_account(&self) -> Result<Option<WalletAccount>, SessionError> {
        let existing = self
            .controller
            .get_authenticated_account()
            .await
            .map_err(SessionError::AccountQuery)?;
        let account = match existing {
            Some(account) => Some(account),
            None => self
                .controller
                .request_authentication()
                .await
                .map_err(SessionError::Wallet)?,
        };

        let changed = {
            let mut state = self.state.write();
            let changed = state.account != account;
            state.account = account.clone();
            changed
        };
        if changed {
            self.signals.account_update(account.clone());
        }
        Ok(account)
    }

    async fn disconnect_account(&self, account: &WalletAccount) -> Result<(), SessionError> {
        self.controller
            .disconnect_account(account)
            .await
            .map_err(SessionError::Wallet)?;

        let was_current = {
            let mut state = self.state.write();
            let was_current = state.account.as_ref() == Some(account);
            if was_current {
                state.account = None;
            }
            was_current
        };
        if was_current {
            self.signals.account_update(None);
        }
        Ok(())
    }

    async fn construct_local_key(
        &self,
        account: &WalletAccount,
        version: KeyVersion,
        password: Option<String>,
    ) -> Result<LocalPrivateKey, SessionError> {
        let handler = WalletDerivationHandler {
            controller: self.controller.as_ref(),
            account,
            password,
        };
        let key = self
            .registry
            .instantiate_new_private_key(
                account.blockchain_group,
                &account.address,
                version,
                PrivateKeyAvailability::Available,
                &handler,
            )
            .await
            .map_err(SessionError::KeyDerivation)?;
        debug!(
            address = %account.address,
            version = version.as_u8(),
            public_key = %key.public_key.to_hex(),
            "Local key derived"
        );
        Ok(key)
    }

    async fn read_remote_keys(&self, account: &WalletAccount) -> RemoteKeySnapshot {
        let mut by_network = BTreeMap::new();
        for chain in &self.chains {
            let network = chain.network();
            match chain.get_address_keys(&account.address).await {
                Ok(keys) => {
                    by_network.insert(network, latest_key(&keys).cloned());
                }
                Err(e) => {
                    warn!(network = %network, address = %account.address, error = %e, "Remote key lookup failed");
                }
            }
        }
        RemoteKeySnapshot::from_networks(by_network)
    }
}
