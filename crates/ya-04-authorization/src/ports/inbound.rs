//! # Inbound Ports
//!
//! API trait defining what the Authorization State Machine can do.

use crate::domain::AuthError;
use async_trait::async_trait;
use shared_bus::SessionEvent;
use shared_types::entities::{
    AuthorizationState, LocalPrivateKey, RemotePublicKey, WalletAccount,
};
use shared_types::networks::EvmNetwork;

/// Authorization State Machine API - inbound port.
#[async_trait]
pub trait AuthorizationApi: Send + Sync {
    /// Current state from the decision list. Never blocks on I/O.
    fn get_authorization_state(&self) -> AuthorizationState;

    /// Apply a session event. Account updates re-read the remote key and
    /// invalidate any flow still running for the previous account.
    async fn handle_event(&self, event: &SessionEvent) -> AuthorizationState;

    /// Re-evaluate and run the automatic authorization flow if the state
    /// calls for it. Concurrent calls collapse into the running flow.
    async fn recompute(&self) -> AuthorizationState;

    /// Drive the session to `AUTHORIZED`, prompting for a password if the
    /// published key needs one. Returns whether the session ended authorized.
    async fn force_authorize(&self) -> bool;

    /// Derive a local key for the current account under the key policy.
    async fn create_local_key(
        &self,
        password: Option<String>,
        force_new: bool,
    ) -> Result<LocalPrivateKey, AuthError>;

    /// Persist a local key and refresh the local key list.
    async fn save_local_key(&self, key: LocalPrivateKey) -> Result<(), AuthError>;

    /// Publish a key's public half through the faucet.
    async fn publish_local_key(
        &self,
        network: EvmNetwork,
        key: &LocalPrivateKey,
        account: &WalletAccount,
    ) -> bool;

    /// Re-read the remote key for the current account.
    async fn reload_remote_keys(&self) -> Option<RemotePublicKey>;

    /// Whether the published key can only be recovered with a password.
    fn is_password_needed(&self) -> bool;

    /// Freshest published key for the current account.
    fn remote_key(&self) -> Option<RemotePublicKey>;

    /// Current account.
    fn wallet_account(&self) -> Option<WalletAccount>;

    /// Whether a remote key fetch is in flight.
    fn is_loading(&self) -> bool;
}
