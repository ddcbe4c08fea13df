//! # Authorization Port Adapters
//!
//! Implements the outbound port traits required by ya-04-authorization.
//!
//! ## Ports Implemented
//!
//! - `KeySource` - Delegates to the ya-01 wallet session
//! - `KeyPublication` - Delegates to the ya-03 faucet publisher

use async_trait::async_trait;
use std::sync::Arc;

use shared_types::entities::{
    KeyVersion, LocalPrivateKey, PublicKey, RemotePublicKey, WalletAccount,
};
use shared_types::errors::CollaboratorError;
use shared_types::networks::EvmNetwork;
use ya_01_wallet_session::{SessionError, WalletSession, WalletSessionApi};
use ya_03_faucet_publisher::{FaucetPublisher, KeyPublisher};
use ya_04_authorization::{KeyPublication, KeySource};

// =============================================================================
// KeySource Adapter
// =============================================================================

/// Adapter implementing ya-04's KeySource trait.
/// Key derivation and remote lookups go through the wallet session.
pub struct SessionKeySource {
    session: Arc<WalletSession>,
}

impl SessionKeySource {
    /// Wrap a session.
    pub fn new(session: Arc<WalletSession>) -> Self {
        Self { session }
    }
}

fn collaborator_error(error: SessionError) -> CollaboratorError {
    match error {
        SessionError::AccountQuery(e) | SessionError::KeyDerivation(e) | SessionError::Wallet(e) => e,
    }
}

#[async_trait]
impl KeySource for SessionKeySource {
    async fn construct_local_key(
        &self,
        account: &WalletAccount,
        version: KeyVersion,
        password: Option<String>,
    ) -> Result<LocalPrivateKey, CollaboratorError> {
        self.session
            .construct_local_key(account, version, password)
            .await
            .map_err(collaborator_error)
    }

    async fn read_remote_key(&self, account: &WalletAccount) -> Option<RemotePublicKey> {
        self.session.read_remote_keys(account).await.freshest
    }
}

// =============================================================================
// KeyPublication Adapter
// =============================================================================

/// Adapter implementing ya-04's KeyPublication trait.
pub struct FaucetKeyPublication {
    publisher: Arc<FaucetPublisher>,
}

impl FaucetKeyPublication {
    /// Wrap a publisher.
    pub fn new(publisher: Arc<FaucetPublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl KeyPublication for FaucetKeyPublication {
    async fn publish(
        &self,
        account: &WalletAccount,
        public_key: &PublicKey,
        network: EvmNetwork,
    ) -> bool {
        self.publisher
            .publish(account, public_key, network)
            .await
            .success
    }
}
