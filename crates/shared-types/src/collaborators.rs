//! # External Collaborators
//!
//! Capability traits for everything this workspace treats as opaque:
//! the wallet provider, the per-network blockchain controllers, the
//! persistent key registry and the messaging core.
//!
//! ## Wallet Events
//!
//! Wallet events are an enumerated set. Listeners are registered per
//! `WalletEventKind` and removed with the `ListenerId` returned at
//! registration; there are no free-form event names.

use crate::entities::{
    Address, Balance, BlockchainGroup, DecryptedContent, KeyVersion, LocalPrivateKey,
    MessageContent, MessageEnvelope, OutgoingContent, PrivateKeyAvailability, PublicKey,
    RemotePublicKey, SendOutcome, TxHash, WalletAccount,
};
use crate::errors::CollaboratorError;
use crate::networks::EvmNetwork;
use crate::protocol::{FeedId, ServiceCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// KEY REGISTRY
// =============================================================================

/// Callbacks the key registry invokes while deriving a new private key.
#[async_trait]
pub trait KeyDerivationHandler: Send + Sync {
    /// Obtain the wallet signature over the registry's challenge string.
    async fn on_private_key_request(
        &self,
        address: &Address,
        magic_string: &str,
    ) -> Result<Vec<u8>, CollaboratorError>;

    /// Obtain the user's messaging password (V1/V2 keys only).
    async fn on_password_request(&self, address: &Address) -> Option<String>;
}

/// Process-wide persistent key store.
#[async_trait]
pub trait KeyRegistry: Send + Sync {
    /// Load persisted keys.
    async fn init(&self) -> Result<(), CollaboratorError>;

    /// Snapshot of the local keys stored for an address.
    fn get_local_private_keys(&self, address: &Address) -> Vec<LocalPrivateKey>;

    /// Persist a local key.
    async fn add_local_private_key(&self, key: LocalPrivateKey) -> Result<(), CollaboratorError>;

    /// Derive a new private key for `address`.
    async fn instantiate_new_private_key(
        &self,
        group: BlockchainGroup,
        address: &Address,
        version: KeyVersion,
        availability: PrivateKeyAvailability,
        handler: &dyn KeyDerivationHandler,
    ) -> Result<LocalPrivateKey, CollaboratorError>;

    /// Cache a confirmed on-chain key.
    async fn add_remote_public_key(&self, key: RemotePublicKey) -> Result<(), CollaboratorError>;
}

// =============================================================================
// WALLET
// =============================================================================

/// Identifier of a registered wallet listener.
pub type ListenerId = u64;

/// The wallet event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletEventKind {
    /// The selected account changed.
    AccountChanged,
    /// The user logged in.
    Login,
    /// The user logged out.
    Logout,
    /// The wallet switched chains.
    BlockchainChanged,
}

impl WalletEventKind {
    /// All kinds, in subscription order.
    pub const ALL: [WalletEventKind; 4] = [
        Self::AccountChanged,
        Self::Login,
        Self::Logout,
        Self::BlockchainChanged,
    ];
}

/// An event raised by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletEvent {
    /// The selected account changed.
    AccountChanged(WalletAccount),
    /// The user logged in.
    Login(WalletAccount),
    /// The user logged out.
    Logout,
    /// The wallet switched chains; carries the chain name or id.
    BlockchainChanged(String),
}

impl WalletEvent {
    /// The kind a listener must subscribe to in order to receive this event.
    #[must_use]
    pub fn kind(&self) -> WalletEventKind {
        match self {
            Self::AccountChanged(_) => WalletEventKind::AccountChanged,
            Self::Login(_) => WalletEventKind::Login,
            Self::Logout => WalletEventKind::Logout,
            Self::BlockchainChanged(_) => WalletEventKind::BlockchainChanged,
        }
    }
}

/// Callback invoked for a subscribed wallet event.
pub type WalletListener = Arc<dyn Fn(WalletEvent) + Send + Sync>;

/// Describes a wallet provider before a controller is attached.
#[async_trait]
pub trait WalletFactory: Send + Sync {
    /// Provider name (e.g. `"generic"`).
    fn wallet(&self) -> &str;

    /// Blockchain group the provider serves.
    fn blockchain_group(&self) -> BlockchainGroup;

    /// Whether the provider is installed and reachable.
    async fn is_wallet_available(&self) -> bool;
}

/// Signed allowance returned by the faucet relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishAuthorization {
    /// Opaque relay payload, passed back verbatim to `attach_public_key`.
    pub payload: serde_json::Value,
}

/// Receipt for a key attachment transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachReceipt {
    /// Transaction hash of the attachment.
    pub tx_hash: TxHash,
}

/// Faucet relay that pays for publishing a public key.
#[async_trait]
pub trait Faucet: Send + Sync {
    /// Ask the relay to sign an allowance for publishing `public_key`.
    async fn authorize_publishing(
        &self,
        account: &WalletAccount,
        public_key: &PublicKey,
        registrar: u32,
    ) -> Result<PublishAuthorization, CollaboratorError>;

    /// Submit the key attachment transaction.
    async fn attach_public_key(
        &self,
        authorization: PublishAuthorization,
    ) -> Result<AttachReceipt, CollaboratorError>;
}

/// One wallet provider's controller.
#[async_trait]
pub trait WalletController: Send + Sync {
    /// Currently authenticated account, if any.
    async fn get_authenticated_account(&self) -> Result<Option<WalletAccount>, CollaboratorError>;

    /// Name or chain id of the chain the wallet is on.
    async fn get_current_blockchain(&self) -> Result<String, CollaboratorError>;

    /// Sign a challenge string with the account's wallet key.
    async fn sign_magic_string(
        &self,
        account: &WalletAccount,
        magic_string: &str,
    ) -> Result<Vec<u8>, CollaboratorError>;

    /// Disconnect an account from this client.
    async fn disconnect_account(&self, account: &WalletAccount) -> Result<(), CollaboratorError>;

    /// Ask the user to authenticate.
    async fn request_authentication(&self) -> Result<Option<WalletAccount>, CollaboratorError>;

    /// Faucet relay scoped to a network.
    async fn get_faucet(&self, network: EvmNetwork) -> Result<Arc<dyn Faucet>, CollaboratorError>;

    /// Raw provider request (EIP-1193 `request`).
    async fn provider_request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, CollaboratorError>;

    /// Register a listener for one event kind.
    fn subscribe(&self, kind: WalletEventKind, listener: WalletListener) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, kind: WalletEventKind, id: ListenerId) -> bool;
}

// =============================================================================
// BLOCKCHAIN
// =============================================================================

/// Read access to one network.
#[async_trait]
pub trait BlockchainController: Send + Sync {
    /// Network this controller reads.
    fn network(&self) -> EvmNetwork;

    /// Native balance of an address.
    async fn get_balance(&self, address: &Address) -> Result<Balance, CollaboratorError>;

    /// All keys published for an address on this network.
    async fn get_address_keys(
        &self,
        address: &Address,
    ) -> Result<Vec<RemotePublicKey>, CollaboratorError>;
}

// =============================================================================
// MESSAGE CORE
// =============================================================================

/// A direct mail write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Sending account.
    pub sender: WalletAccount,
    /// Recipient addresses.
    pub recipients: Vec<Address>,
    /// Message content.
    pub content: OutgoingContent,
    /// Service code.
    pub service_code: ServiceCode,
    /// Feed the message is tagged with.
    pub feed_id: FeedId,
}

/// A broadcast write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRequest {
    /// Sending account.
    pub sender: WalletAccount,
    /// Message content.
    pub content: OutgoingContent,
    /// Service code.
    pub service_code: ServiceCode,
    /// Feed the message is tagged with.
    pub feed_id: FeedId,
    /// Personal (sender-scoped) broadcast.
    pub is_personal: bool,
}

/// Message encryption, writing and reading.
#[async_trait]
pub trait MessageCore: Send + Sync {
    /// Encrypt and write a direct message.
    async fn send_message(
        &self,
        wallet: &dyn WalletController,
        request: SendMessageRequest,
        network: EvmNetwork,
    ) -> Result<SendOutcome, CollaboratorError>;

    /// Write a broadcast.
    async fn broadcast_message(
        &self,
        wallet: &dyn WalletController,
        request: BroadcastRequest,
        network: EvmNetwork,
    ) -> Result<SendOutcome, CollaboratorError>;

    /// Fetch raw content for a message header.
    async fn get_message_content(
        &self,
        message: &MessageEnvelope,
    ) -> Result<Option<MessageContent>, CollaboratorError>;

    /// Decrypt direct mail addressed to `recipient`.
    async fn decrypt_message_content(
        &self,
        recipient: &WalletAccount,
        message: &MessageEnvelope,
        content: &MessageContent,
    ) -> Result<DecryptedContent, CollaboratorError>;

    /// Decode broadcast content (not encrypted).
    fn decrypt_broadcast_content(
        &self,
        message: &MessageEnvelope,
        content: &MessageContent,
    ) -> Result<DecryptedContent, CollaboratorError>;
}
