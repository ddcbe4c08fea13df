//! # Sandbox Collaborators
//!
//! In-memory implementations of every external collaborator trait.
//! They back the unit and integration tests and the runtime's demo mode.
//!
//! Key derivation here is a deterministic Keccak construction over the
//! wallet signature and password: the same wallet and password always
//! yield the same key, a different password yields a different key. It
//! is NOT real cryptography.

use crate::collaborators::{
    AttachReceipt, BlockchainController, BroadcastRequest, Faucet, KeyDerivationHandler,
    KeyRegistry, ListenerId, MessageCore, PublishAuthorization, SendMessageRequest,
    WalletController, WalletEvent, WalletEventKind, WalletFactory, WalletListener,
};
use crate::entities::{
    Address, Balance, BlockchainGroup, DecryptedContent, KeyVersion, LocalPrivateKey,
    MessageContent, MessageEnvelope, PrivateKeyAvailability, PublicKey, RemotePublicKey,
    SendOutcome, TxHash, WalletAccount,
};
use crate::errors::CollaboratorError;
use crate::networks::EvmNetwork;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

fn keccak(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

// =============================================================================
// LEDGER + CHAINS
// =============================================================================

/// Shared on-chain state for all sandbox networks.
#[derive(Default)]
pub struct SandboxLedger {
    keys: RwLock<HashMap<(EvmNetwork, Address), Vec<RemotePublicKey>>>,
    balances: RwLock<HashMap<(EvmNetwork, Address), Balance>>,
    failing: RwLock<Vec<EvmNetwork>>,
    clock: AtomicU64,
    tx_counter: AtomicU64,
}

impl SandboxLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Allocate a fresh transaction hash.
    pub fn next_tx_hash(&self) -> TxHash {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("0x{:064x}", n)
    }

    /// Write a key for `address` on `network`, returning the tx hash.
    pub fn publish_key(
        &self,
        network: EvmNetwork,
        address: &Address,
        public_key: PublicKey,
        registrar: u32,
    ) -> TxHash {
        let timestamp = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        let record = RemotePublicKey {
            blockchain: network.name().to_string(),
            address: address.clone(),
            public_key,
            timestamp,
            registrar,
        };
        debug!(network = %network, address = %address, "sandbox key published");
        self.keys
            .write()
            .entry((network, address.clone()))
            .or_default()
            .push(record);
        self.next_tx_hash()
    }

    /// Keys written for `address` on `network`.
    #[must_use]
    pub fn keys_for(&self, network: EvmNetwork, address: &Address) -> Vec<RemotePublicKey> {
        self.keys
            .read()
            .get(&(network, address.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Set the native balance of an address.
    pub fn set_balance(&self, network: EvmNetwork, address: &Address, numeric: f64) {
        let balance = Balance {
            original: format!("{numeric}"),
            numeric,
            e18: format!("{:.0}", numeric * 1e18),
        };
        self.balances
            .write()
            .insert((network, address.clone()), balance);
    }

    /// Make every read against `network` fail with an RPC error.
    pub fn set_network_failing(&self, network: EvmNetwork, failing: bool) {
        let mut set = self.failing.write();
        set.retain(|n| *n != network);
        if failing {
            set.push(network);
        }
    }

    fn check_available(&self, network: EvmNetwork) -> Result<(), CollaboratorError> {
        if self.failing.read().contains(&network) {
            return Err(CollaboratorError::Rpc(format!("{network} RPC unreachable")));
        }
        Ok(())
    }

    /// One blockchain controller per supported network.
    #[must_use]
    pub fn controllers(self: &Arc<Self>) -> Vec<Arc<dyn BlockchainController>> {
        EvmNetwork::ALL
            .iter()
            .map(|network| {
                Arc::new(SandboxChain {
                    network: *network,
                    ledger: Arc::clone(self),
                }) as Arc<dyn BlockchainController>
            })
            .collect()
    }
}

/// Blockchain controller reading one network of a [`SandboxLedger`].
pub struct SandboxChain {
    network: EvmNetwork,
    ledger: Arc<SandboxLedger>,
}

#[async_trait]
impl BlockchainController for SandboxChain {
    fn network(&self) -> EvmNetwork {
        self.network
    }

    async fn get_balance(&self, address: &Address) -> Result<Balance, CollaboratorError> {
        self.ledger.check_available(self.network)?;
        Ok(self
            .ledger
            .balances
            .read()
            .get(&(self.network, address.clone()))
            .cloned()
            .unwrap_or(Balance {
                original: "0".to_string(),
                numeric: 0.0,
                e18: "0".to_string(),
            }))
    }

    async fn get_address_keys(
        &self,
        address: &Address,
    ) -> Result<Vec<RemotePublicKey>, CollaboratorError> {
        self.ledger.check_available(self.network)?;
        Ok(self.ledger.keys_for(self.network, address))
    }
}

// =============================================================================
// KEY REGISTRY
// =============================================================================

/// Key registry holding everything in memory.
#[derive(Default)]
pub struct InMemoryKeyRegistry {
    local: RwLock<HashMap<Address, Vec<LocalPrivateKey>>>,
    remote: RwLock<Vec<RemotePublicKey>>,
    initialized: AtomicBool,
}

impl InMemoryKeyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Remote keys cached through `add_remote_public_key`.
    #[must_use]
    pub fn remote_keys(&self) -> Vec<RemotePublicKey> {
        self.remote.read().clone()
    }

    /// Whether `init` was called.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Challenge string the wallet is asked to sign.
    #[must_use]
    pub fn magic_string(address: &Address, version: KeyVersion) -> String {
        format!("$ylide${}$ylide-key-v{}$", address, version.as_u8())
    }
}

#[async_trait]
impl KeyRegistry for InMemoryKeyRegistry {
    async fn init(&self) -> Result<(), CollaboratorError> {
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn get_local_private_keys(&self, address: &Address) -> Vec<LocalPrivateKey> {
        self.local.read().get(address).cloned().unwrap_or_default()
    }

    async fn add_local_private_key(&self, key: LocalPrivateKey) -> Result<(), CollaboratorError> {
        let mut local = self.local.write();
        let keys = local.entry(key.address.clone()).or_default();
        keys.retain(|k| !k.public_key.same_bytes(&key.public_key));
        keys.push(key);
        Ok(())
    }

    async fn instantiate_new_private_key(
        &self,
        group: BlockchainGroup,
        address: &Address,
        version: KeyVersion,
        availability: PrivateKeyAvailability,
        handler: &dyn KeyDerivationHandler,
    ) -> Result<LocalPrivateKey, CollaboratorError> {
        let magic = Self::magic_string(address, version);
        let signature = handler.on_private_key_request(address, &magic).await?;

        let password = if version.requires_password() {
            handler
                .on_password_request(address)
                .await
                .ok_or_else(|| CollaboratorError::Rejected("password not provided".into()))?
        } else {
            String::new()
        };

        let secret = keccak(&[
            b"ylide-sandbox-key",
            &[version.as_u8()],
            &signature,
            password.as_bytes(),
        ]);
        let public = keccak(&[&secret]);

        Ok(LocalPrivateKey {
            address: address.clone(),
            blockchain_group: group,
            public_key: PublicKey::new(public.to_vec(), version),
            availability,
        })
    }

    async fn add_remote_public_key(&self, key: RemotePublicKey) -> Result<(), CollaboratorError> {
        self.remote.write().push(key);
        Ok(())
    }
}

// =============================================================================
// WALLET + FAUCET
// =============================================================================

/// Faucet step the sandbox wallet should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaucetFailure {
    /// Relay refuses to sign the allowance.
    Authorize,
    /// Attachment transaction fails.
    Attach,
    /// Attachment "succeeds" but the key never lands on-chain.
    NeverConfirm,
}

/// Wallet provider driven by test code.
pub struct SandboxWallet {
    seed: [u8; 32],
    available: AtomicBool,
    account: RwLock<Option<WalletAccount>>,
    pending_login: RwLock<Option<WalletAccount>>,
    blockchain: RwLock<String>,
    listeners: Mutex<HashMap<WalletEventKind, Vec<(ListenerId, WalletListener)>>>,
    next_listener: AtomicU64,
    ledger: Arc<SandboxLedger>,
    faucet_failure: RwLock<Option<FaucetFailure>>,
    fail_blockchain_query: AtomicBool,
    fail_account_query: AtomicBool,
    reject_signatures: AtomicBool,
    reject_add_chain: AtomicBool,
    reject_switch: AtomicBool,
    requests: Mutex<Vec<(String, serde_json::Value)>>,
    signature_requests: AtomicUsize,
}

impl SandboxWallet {
    /// Create a wallet on `blockchain` writing to `ledger`.
    pub fn new(seed: [u8; 32], blockchain: &str, ledger: Arc<SandboxLedger>) -> Arc<Self> {
        Arc::new(Self {
            seed,
            available: AtomicBool::new(true),
            account: RwLock::new(None),
            pending_login: RwLock::new(None),
            blockchain: RwLock::new(blockchain.to_string()),
            listeners: Mutex::new(HashMap::new()),
            next_listener: AtomicU64::new(1),
            ledger,
            faucet_failure: RwLock::new(None),
            fail_blockchain_query: AtomicBool::new(false),
            fail_account_query: AtomicBool::new(false),
            reject_signatures: AtomicBool::new(false),
            reject_add_chain: AtomicBool::new(false),
            reject_switch: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
            signature_requests: AtomicUsize::new(0),
        })
    }

    /// Deliver an event to every listener subscribed to its kind.
    pub fn emit(&self, event: WalletEvent) {
        let targets: Vec<WalletListener> = self
            .listeners
            .lock()
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();
        for listener in targets {
            listener(event.clone());
        }
    }

    /// Set the authenticated account without raising an event.
    pub fn set_account(&self, account: Option<WalletAccount>) {
        *self.account.write() = account;
    }

    /// Account `request_authentication` will yield.
    pub fn set_pending_login(&self, account: Option<WalletAccount>) {
        *self.pending_login.write() = account;
    }

    /// Log in and raise `Login`.
    pub fn login(&self, account: WalletAccount) {
        self.set_account(Some(account.clone()));
        self.emit(WalletEvent::Login(account));
    }

    /// Switch account and raise `AccountChanged`.
    pub fn change_account(&self, account: WalletAccount) {
        self.set_account(Some(account.clone()));
        self.emit(WalletEvent::AccountChanged(account));
    }

    /// Log out and raise `Logout`.
    pub fn logout(&self) {
        self.set_account(None);
        self.emit(WalletEvent::Logout);
    }

    /// Switch chains and raise `BlockchainChanged`.
    pub fn switch_blockchain(&self, name: &str) {
        *self.blockchain.write() = name.to_string();
        self.emit(WalletEvent::BlockchainChanged(name.to_string()));
    }

    /// Number of registered listeners across all kinds.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().values().map(Vec::len).sum()
    }

    /// Provider requests received so far, in order.
    #[must_use]
    pub fn provider_requests(&self) -> Vec<(String, serde_json::Value)> {
        self.requests.lock().clone()
    }

    /// Number of `sign_magic_string` calls.
    #[must_use]
    pub fn signature_request_count(&self) -> usize {
        self.signature_requests.load(Ordering::SeqCst)
    }

    /// Configure where the faucet fails.
    pub fn set_faucet_failure(&self, failure: Option<FaucetFailure>) {
        *self.faucet_failure.write() = failure;
    }

    /// Make `get_current_blockchain` fail.
    pub fn set_fail_blockchain_query(&self, fail: bool) {
        self.fail_blockchain_query.store(fail, Ordering::SeqCst);
    }

    /// Make `get_authenticated_account` fail.
    pub fn set_fail_account_query(&self, fail: bool) {
        self.fail_account_query.store(fail, Ordering::SeqCst);
    }

    /// Make the user decline every signature request.
    pub fn set_reject_signatures(&self, reject: bool) {
        self.reject_signatures.store(reject, Ordering::SeqCst);
    }

    /// Make `wallet_addEthereumChain` fail.
    pub fn set_reject_add_chain(&self, reject: bool) {
        self.reject_add_chain.store(reject, Ordering::SeqCst);
    }

    /// Make `wallet_switchEthereumChain` fail.
    pub fn set_reject_switch(&self, reject: bool) {
        self.reject_switch.store(reject, Ordering::SeqCst);
    }

    /// Make the provider report itself as not installed.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletFactory for SandboxWallet {
    fn wallet(&self) -> &str {
        "generic"
    }

    fn blockchain_group(&self) -> BlockchainGroup {
        BlockchainGroup::Evm
    }

    async fn is_wallet_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletController for SandboxWallet {
    async fn get_authenticated_account(&self) -> Result<Option<WalletAccount>, CollaboratorError> {
        if self.fail_account_query.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Rpc("account query failed".into()));
        }
        Ok(self.account.read().clone())
    }

    async fn get_current_blockchain(&self) -> Result<String, CollaboratorError> {
        if self.fail_blockchain_query.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Rpc("chain query failed".into()));
        }
        Ok(self.blockchain.read().clone())
    }

    async fn sign_magic_string(
        &self,
        account: &WalletAccount,
        magic_string: &str,
    ) -> Result<Vec<u8>, CollaboratorError> {
        self.signature_requests.fetch_add(1, Ordering::SeqCst);
        if self.reject_signatures.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Rejected("user denied signature".into()));
        }
        Ok(keccak(&[
            &self.seed,
            account.address.as_str().as_bytes(),
            magic_string.as_bytes(),
        ])
        .to_vec())
    }

    async fn disconnect_account(&self, account: &WalletAccount) -> Result<(), CollaboratorError> {
        let mut current = self.account.write();
        if current.as_ref() == Some(account) {
            *current = None;
        }
        Ok(())
    }

    async fn request_authentication(&self) -> Result<Option<WalletAccount>, CollaboratorError> {
        let account = self.pending_login.read().clone();
        if let Some(acc) = &account {
            self.set_account(Some(acc.clone()));
        }
        Ok(account)
    }

    async fn get_faucet(&self, network: EvmNetwork) -> Result<Arc<dyn Faucet>, CollaboratorError> {
        if !network.has_faucet() {
            return Err(CollaboratorError::Unavailable(format!(
                "no faucet for {network}"
            )));
        }
        Ok(Arc::new(SandboxFaucet {
            network,
            ledger: Arc::clone(&self.ledger),
            failure: *self.faucet_failure.read(),
        }))
    }

    async fn provider_request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, CollaboratorError> {
        self.requests.lock().push((method.to_string(), params.clone()));
        match method {
            "wallet_addEthereumChain" => {
                if self.reject_add_chain.load(Ordering::SeqCst) {
                    return Err(CollaboratorError::Rejected("chain already added".into()));
                }
                Ok(serde_json::Value::Null)
            }
            "wallet_switchEthereumChain" => {
                if self.reject_switch.load(Ordering::SeqCst) {
                    return Err(CollaboratorError::Rejected("user denied switch".into()));
                }
                let network = params[0]["chainId"]
                    .as_str()
                    .and_then(EvmNetwork::from_name)
                    .ok_or_else(|| CollaboratorError::InvalidResponse("bad chainId".into()))?;
                self.switch_blockchain(network.name());
                Ok(serde_json::Value::Null)
            }
            other => Err(CollaboratorError::Unavailable(format!(
                "unsupported method {other}"
            ))),
        }
    }

    fn subscribe(&self, kind: WalletEventKind, listener: WalletListener) -> ListenerId {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .lock()
            .entry(kind)
            .or_default()
            .push((id, listener));
        id
    }

    fn unsubscribe(&self, kind: WalletEventKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(list) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        before != list.len()
    }
}

#[derive(Serialize, Deserialize)]
struct AllowancePayload {
    address: String,
    key: String,
    version: u8,
    registrar: u32,
}

/// Faucet relay writing straight to a [`SandboxLedger`].
pub struct SandboxFaucet {
    network: EvmNetwork,
    ledger: Arc<SandboxLedger>,
    failure: Option<FaucetFailure>,
}

#[async_trait]
impl Faucet for SandboxFaucet {
    async fn authorize_publishing(
        &self,
        account: &WalletAccount,
        public_key: &PublicKey,
        registrar: u32,
    ) -> Result<PublishAuthorization, CollaboratorError> {
        if self.failure == Some(FaucetFailure::Authorize) {
            return Err(CollaboratorError::Rpc("relay refused allowance".into()));
        }
        let payload = AllowancePayload {
            address: account.address.to_string(),
            key: hex::encode(&public_key.key_bytes),
            version: public_key.key_version.as_u8(),
            registrar,
        };
        let payload = serde_json::to_value(payload)
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;
        Ok(PublishAuthorization { payload })
    }

    async fn attach_public_key(
        &self,
        authorization: PublishAuthorization,
    ) -> Result<AttachReceipt, CollaboratorError> {
        if self.failure == Some(FaucetFailure::Attach) {
            return Err(CollaboratorError::Rpc("attach transaction reverted".into()));
        }
        let payload: AllowancePayload = serde_json::from_value(authorization.payload)
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;
        if self.failure == Some(FaucetFailure::NeverConfirm) {
            return Ok(AttachReceipt {
                tx_hash: self.ledger.next_tx_hash(),
            });
        }

        let key_bytes =
            hex::decode(&payload.key).map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;
        let version = KeyVersion::try_from(payload.version)
            .map_err(|v| CollaboratorError::InvalidResponse(format!("key version {v}")))?;
        let tx_hash = self.ledger.publish_key(
            self.network,
            &Address::new(&payload.address),
            PublicKey::new(key_bytes, version),
            payload.registrar,
        );
        Ok(AttachReceipt { tx_hash })
    }
}

// =============================================================================
// MESSAGE CORE
// =============================================================================

/// A message write recorded by [`SandboxMessageCore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    /// Direct mail.
    Mail(SendMessageRequest, EvmNetwork),
    /// Broadcast.
    Broadcast(BroadcastRequest, EvmNetwork),
}

/// Message core recording writes and serving stored content.
pub struct SandboxMessageCore {
    ledger: Arc<SandboxLedger>,
    sent: Mutex<Vec<SentMessage>>,
    contents: RwLock<HashMap<String, MessageContent>>,
    fail_writes: AtomicBool,
}

impl SandboxMessageCore {
    /// Create a message core writing to `ledger`.
    pub fn new(ledger: Arc<SandboxLedger>) -> Arc<Self> {
        Arc::new(Self {
            ledger,
            sent: Mutex::new(Vec::new()),
            contents: RwLock::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        })
    }

    /// Make message writes fail with an RPC error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), CollaboratorError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Rpc("message write reverted".into()));
        }
        Ok(())
    }

    /// Store content for `msg_id` as `subject\nbody`.
    pub fn store_content(&self, msg_id: &str, subject: &str, body: &str, corrupted: bool) {
        let content = MessageContent {
            corrupted,
            body: format!("{subject}\n{body}").into_bytes(),
        };
        self.contents.write().insert(msg_id.to_string(), content);
    }

    /// Writes made so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    fn decode(content: &MessageContent) -> Result<DecryptedContent, CollaboratorError> {
        let text = String::from_utf8(content.body.clone())
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;
        let (subject, body) = text.split_once('\n').unwrap_or((text.as_str(), ""));
        Ok(DecryptedContent {
            subject: subject.to_string(),
            content: body.to_string(),
        })
    }
}

#[async_trait]
impl MessageCore for SandboxMessageCore {
    async fn send_message(
        &self,
        _wallet: &dyn WalletController,
        request: SendMessageRequest,
        network: EvmNetwork,
    ) -> Result<SendOutcome, CollaboratorError> {
        self.check_writable()?;
        self.sent.lock().push(SentMessage::Mail(request, network));
        Ok(SendOutcome {
            tx_hash: self.ledger.next_tx_hash(),
            blockchain: network.name().to_string(),
        })
    }

    async fn broadcast_message(
        &self,
        _wallet: &dyn WalletController,
        request: BroadcastRequest,
        network: EvmNetwork,
    ) -> Result<SendOutcome, CollaboratorError> {
        self.check_writable()?;
        self.sent.lock().push(SentMessage::Broadcast(request, network));
        Ok(SendOutcome {
            tx_hash: self.ledger.next_tx_hash(),
            blockchain: network.name().to_string(),
        })
    }

    async fn get_message_content(
        &self,
        message: &MessageEnvelope,
    ) -> Result<Option<MessageContent>, CollaboratorError> {
        Ok(self.contents.read().get(&message.msg_id).cloned())
    }

    async fn decrypt_message_content(
        &self,
        _recipient: &WalletAccount,
        _message: &MessageEnvelope,
        content: &MessageContent,
    ) -> Result<DecryptedContent, CollaboratorError> {
        Self::decode(content)
    }

    fn decrypt_broadcast_content(
        &self,
        _message: &MessageEnvelope,
        content: &MessageContent,
    ) -> Result<DecryptedContent, CollaboratorError> {
        Self::decode(content)
    }
}
