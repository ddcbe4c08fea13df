//! # Core Domain Entities
//!
//! Defines the session data model shared by every subsystem crate.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `WalletAccount`, `ExternalIdentity`
//! - **Keys**: `PublicKey`, `LocalPrivateKey`, `RemotePublicKey`
//! - **Authorization**: `AuthorizationState`
//! - **Messaging**: `OutgoingContent`, `MessageEnvelope`, `DecryptedContent`

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A wallet address, normalized to lowercase.
///
/// Two addresses compare equal regardless of the checksum casing the
/// wallet provider used when it reported them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create a normalized address.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// Borrow the normalized string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Family of blockchains sharing an address format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BlockchainGroup {
    /// Ethereum-compatible chains.
    #[default]
    Evm,
}

impl BlockchainGroup {
    /// Canonical group name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evm => "evm",
        }
    }
}

/// The authenticated identity inside one wallet provider.
///
/// Issued by the wallet controller and never mutated; an account change
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAccount {
    /// Account address.
    pub address: Address,
    /// Blockchain group the address belongs to.
    pub blockchain_group: BlockchainGroup,
}

impl WalletAccount {
    /// Create an EVM wallet account.
    pub fn evm(address: impl AsRef<str>) -> Self {
        Self {
            address: Address::new(address),
            blockchain_group: BlockchainGroup::Evm,
        }
    }
}

/// An externally verified (DID) identity bound to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// The account the identity provider authenticated.
    pub account: String,
    /// The identity identifier issued by the provider.
    pub identifier: String,
}

// =============================================================================
// CLUSTER B: KEYS
// =============================================================================

/// Messaging key generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyVersion {
    /// Legacy key derived from signature and password without salting.
    InsecureV1 = 1,
    /// Password-protected key.
    V2 = 2,
    /// Passwordless key derived from the wallet signature alone.
    V3 = 3,
}

impl KeyVersion {
    /// Whether deriving this key version needs the user's password.
    #[must_use]
    pub fn requires_password(&self) -> bool {
        matches!(self, Self::InsecureV1 | Self::V2)
    }

    /// Numeric protocol value.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for KeyVersion {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::InsecureV1),
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            other => Err(other),
        }
    }
}

/// A messaging public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    /// Raw key bytes.
    pub key_bytes: Vec<u8>,
    /// Generation the key was derived with.
    pub key_version: KeyVersion,
}

impl PublicKey {
    /// Create a public key.
    pub fn new(key_bytes: Vec<u8>, key_version: KeyVersion) -> Self {
        Self {
            key_bytes,
            key_version,
        }
    }

    /// Compare key material only; the version is ignored.
    #[must_use]
    pub fn same_bytes(&self, other: &PublicKey) -> bool {
        self.key_bytes == other.key_bytes
    }

    /// Hex rendering for logs.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.key_bytes))
    }
}

/// Whether a private key can be used without further user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PrivateKeyAvailability {
    /// Key material is held in memory.
    #[default]
    Available,
    /// Key material is stored encrypted and must be unlocked.
    Encrypted,
}

/// A private key held only by this client.
///
/// The secret half stays inside the key registry; this value is the
/// registry's handle plus the public half used for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPrivateKey {
    /// Owning address.
    pub address: Address,
    /// Blockchain group of the owning address.
    pub blockchain_group: BlockchainGroup,
    /// Public half of the key pair.
    pub public_key: PublicKey,
    /// Availability state.
    pub availability: PrivateKeyAvailability,
}

impl LocalPrivateKey {
    /// Generation of this key.
    #[must_use]
    pub fn key_version(&self) -> KeyVersion {
        self.public_key.key_version
    }
}

/// The latest key published on-chain for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePublicKey {
    /// Network the key was read from.
    pub blockchain: String,
    /// Owning address.
    pub address: Address,
    /// Published public key.
    pub public_key: PublicKey,
    /// Publication timestamp (seconds); the freshest key wins.
    pub timestamp: u64,
    /// Registrar that paid for the publication.
    pub registrar: u32,
}

impl RemotePublicKey {
    /// Generation of the published key.
    #[must_use]
    pub fn key_version(&self) -> KeyVersion {
        self.public_key.key_version
    }
}

// =============================================================================
// CLUSTER C: AUTHORIZATION
// =============================================================================

/// Whether the current account holds a usable messaging key.
///
/// Always derived from session state, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationState {
    /// Session not initialized or a fetch is in flight.
    Loading,
    /// No account (or no verified identity) is bound.
    NotAuthorized,
    /// Nothing published on-chain for the account.
    NoRemoteKey,
    /// A key is published but this client holds no key for the address.
    HasRemoteButNoLocalKey,
    /// This client holds a key for the address but it is not the published one.
    LocalRemoteMismatch,
    /// A local key matches the published key.
    Authorized,
}

impl AuthorizationState {
    /// Every state, in decision-list order.
    pub const ALL: [AuthorizationState; 6] = [
        Self::Loading,
        Self::NotAuthorized,
        Self::NoRemoteKey,
        Self::HasRemoteButNoLocalKey,
        Self::LocalRemoteMismatch,
        Self::Authorized,
    ];

    /// Stable label used in logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::NoRemoteKey => "NO_REMOTE_KEY",
            Self::HasRemoteButNoLocalKey => "HAS_REMOTE_BUT_NO_LOCAL_KEY",
            Self::LocalRemoteMismatch => "LOCAL_REMOTE_MISMATCH",
            Self::Authorized => "AUTHORIZED",
        }
    }

    /// States in which the driver tries to establish a key.
    #[must_use]
    pub fn needs_key(&self) -> bool {
        matches!(self, Self::NoRemoteKey | Self::HasRemoteButNoLocalKey)
    }
}

impl fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER D: MESSAGING
// =============================================================================

/// Transaction hash returned by a chain write.
pub type TxHash = String;

/// Content of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingContent {
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub content: String,
}

/// Result of a send or broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    /// Transaction identifier of the message write.
    pub tx_hash: TxHash,
    /// Network the message was written to.
    pub blockchain: String,
}

/// Header of a message read from a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Message identifier.
    pub msg_id: String,
    /// Whether the message was broadcast (unencrypted to a feed).
    pub is_broadcast: bool,
    /// Sender address.
    pub sender: Address,
    /// Network the message lives on.
    pub blockchain: String,
}

/// Raw (still encrypted) message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Whether the content failed integrity checks.
    pub corrupted: bool,
    /// Content bytes.
    pub body: Vec<u8>,
}

/// Decrypted message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedContent {
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub content: String,
}

/// Native balance of an address on one network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Balance as reported by the chain, in display units.
    pub original: String,
    /// Balance as a float, for sorting and display.
    pub numeric: f64,
    /// Balance in base units (1e18 scale).
    pub e18: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalized() {
        let a = Address::new("0xABCdef");
        let b = Address::new(" 0xabcDEF ");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "0xabcdef");
    }

    #[test]
    fn test_password_requirement_by_version() {
        assert!(KeyVersion::InsecureV1.requires_password());
        assert!(KeyVersion::V2.requires_password());
        assert!(!KeyVersion::V3.requires_password());
    }

    #[test]
    fn test_key_version_from_u8() {
        assert_eq!(KeyVersion::try_from(2), Ok(KeyVersion::V2));
        assert_eq!(KeyVersion::try_from(7), Err(7));
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(AuthorizationState::Authorized.to_string(), "AUTHORIZED");
        assert!(AuthorizationState::NoRemoteKey.needs_key());
        assert!(!AuthorizationState::LocalRemoteMismatch.needs_key());
    }

    #[test]
    fn test_same_bytes_ignores_version() {
        let a = PublicKey::new(vec![1, 2, 3], KeyVersion::V2);
        let b = PublicKey::new(vec![1, 2, 3], KeyVersion::V3);
        let c = PublicKey::new(vec![9], KeyVersion::V2);
        assert!(a.same_bytes(&b));
        assert!(!a.same_bytes(&c));
    }
}
