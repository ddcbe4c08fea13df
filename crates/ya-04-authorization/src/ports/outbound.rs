//! # Outbound Ports
//!
//! Dependencies of the Authorization State Machine. The runtime bridges
//! these onto the wallet session and the faucet publisher.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::Notice;
use shared_types::entities::{
    Address, AuthorizationState, BlockchainGroup, KeyVersion, LocalPrivateKey,
    PrivateKeyAvailability, PublicKey, RemotePublicKey, WalletAccount,
};
use shared_types::errors::CollaboratorError;
use shared_types::networks::EvmNetwork;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Key derivation and remote key lookup - outbound port.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Derive a local key. Requests the wallet signature.
    async fn construct_local_key(
        &self,
        account: &WalletAccount,
        version: KeyVersion,
        password: Option<String>,
    ) -> Result<LocalPrivateKey, CollaboratorError>;

    /// Freshest published key across all networks.
    async fn read_remote_key(&self, account: &WalletAccount) -> Option<RemotePublicKey>;
}

/// Faucet publication - outbound port.
#[async_trait]
pub trait KeyPublication: Send + Sync {
    /// Publish and wait for confirmation. Never errors.
    async fn publish(
        &self,
        account: &WalletAccount,
        public_key: &PublicKey,
        network: EvmNetwork,
    ) -> bool;
}

/// Password prompts, notices and state reports - outbound port.
#[async_trait]
pub trait AuthInteraction: Send + Sync {
    /// Ask for the key password. `retry` is set after a wrong password.
    /// `None` means the user closed the prompt.
    async fn request_password(&self, address: &Address, retry: bool) -> Option<String>;

    /// Show a notice.
    fn notify(&self, notice: Notice);

    /// The derived state changed.
    fn state_changed(
        &self,
        address: Option<&Address>,
        from: AuthorizationState,
        to: AuthorizationState,
    );
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Deterministic key source with an in-memory "chain".
#[derive(Debug, Default)]
pub struct MockKeySource {
    remote: Mutex<HashMap<Address, RemotePublicKey>>,
    lookup_delays: Mutex<HashMap<Address, Duration>>,
    clock: AtomicU64,
    fail_derivation: AtomicBool,
    derivations: Mutex<Vec<(Address, KeyVersion)>>,
}

impl MockKeySource {
    /// Create a shared source.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Key bytes the mock derives for these inputs.
    pub fn derive_bytes(address: &Address, version: KeyVersion, password: Option<&str>) -> Vec<u8> {
        format!("{}|v{}|{}", address, version.as_u8(), password.unwrap_or(""))
            .into_bytes()
    }

    /// Publish the key that `password` would derive.
    pub fn publish_derived(&self, address: &Address, version: KeyVersion, password: Option<&str>) {
        let bytes = Self::derive_bytes(address, version, password);
        self.publish(address, PublicKey::new(bytes, version));
    }

    /// Publish an arbitrary key.
    pub fn publish(&self, address: &Address, public_key: PublicKey) {
        let timestamp = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        self.remote.lock().insert(
            address.clone(),
            RemotePublicKey {
                blockchain: EvmNetwork::Gnosis.name().to_string(),
                address: address.clone(),
                public_key,
                timestamp,
                registrar: 4,
            },
        );
    }

    /// Delay lookups for `address`.
    pub fn set_lookup_delay(&self, address: &Address, delay: Duration) {
        self.lookup_delays.lock().insert(address.clone(), delay);
    }

    /// Make derivations fail as if the user rejected the signature.
    pub fn set_fail_derivation(&self, fail: bool) {
        self.fail_derivation.store(fail, Ordering::SeqCst);
    }

    /// Derivations requested so far.
    pub fn derivations(&self) -> Vec<(Address, KeyVersion)> {
        self.derivations.lock().clone()
    }
}

#[async_trait]
impl KeySource for MockKeySource {
    async fn construct_local_key(
        &self,
        account: &WalletAccount,
        version: KeyVersion,
        password: Option<String>,
    ) -> Result<LocalPrivateKey, CollaboratorError> {
        self.derivations
            .lock()
            .push((account.address.clone(), version));
        if self.fail_derivation.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Rejected("user rejected signature".into()));
        }
        let bytes = Self::derive_bytes(&account.address, version, password.as_deref());
        Ok(LocalPrivateKey {
            address: account.address.clone(),
            blockchain_group: BlockchainGroup::Evm,
            public_key: PublicKey::new(bytes, version),
            availability: PrivateKeyAvailability::Available,
        })
    }

    async fn read_remote_key(&self, account: &WalletAccount) -> Option<RemotePublicKey> {
        let delay = self.lookup_delays.lock().get(&account.address).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.remote.lock().get(&account.address).cloned()
    }
}

/// Publisher that writes straight into a [`MockKeySource`].
pub struct MockPublication {
    keys: Arc<MockKeySource>,
    succeed: AtomicBool,
    calls: Mutex<Vec<(Address, EvmNetwork)>>,
}

impl MockPublication {
    /// Create a publisher that succeeds.
    pub fn new(keys: Arc<MockKeySource>) -> Self {
        Self {
            keys,
            succeed: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Toggle success.
    pub fn set_succeed(&self, succeed: bool) {
        self.succeed.store(succeed, Ordering::SeqCst);
    }

    /// Publications attempted so far.
    pub fn calls(&self) -> Vec<(Address, EvmNetwork)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl KeyPublication for MockPublication {
    async fn publish(
        &self,
        account: &WalletAccount,
        public_key: &PublicKey,
        network: EvmNetwork,
    ) -> bool {
        self.calls.lock().push((account.address.clone(), network));
        if !self.succeed.load(Ordering::SeqCst) {
            return false;
        }
        self.keys.publish(&account.address, public_key.clone());
        true
    }
}

/// Interaction double answering password prompts from a script.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    passwords: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<(Address, bool)>>,
    notices: Mutex<Vec<Notice>>,
    transitions: Mutex<Vec<(AuthorizationState, AuthorizationState)>>,
}

impl ScriptedInteraction {
    /// Queue the answer for the next prompt. An exhausted script cancels.
    pub fn push_password(&self, password: Option<&str>) {
        self.passwords
            .lock()
            .push_back(password.map(str::to_string));
    }

    /// Prompts opened so far as `(address, retry)`.
    pub fn prompts(&self) -> Vec<(Address, bool)> {
        self.prompts.lock().clone()
    }

    /// Notice messages shown so far.
    pub fn messages(&self) -> Vec<String> {
        self.notices.lock().iter().map(|n| n.message.clone()).collect()
    }

    /// Notices shown so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// State transitions reported so far.
    pub fn transitions(&self) -> Vec<(AuthorizationState, AuthorizationState)> {
        self.transitions.lock().clone()
    }
}

#[async_trait]
impl AuthInteraction for ScriptedInteraction {
    async fn request_password(&self, address: &Address, retry: bool) -> Option<String> {
        self.prompts.lock().push((address.clone(), retry));
        self.passwords.lock().pop_front().flatten()
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }

    fn state_changed(
        &self,
        _address: Option<&Address>,
        from: AuthorizationState,
        to: AuthorizationState,
    ) {
        self.transitions.lock().push((from, to));
    }
}
