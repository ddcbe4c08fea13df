//! # Inbound Ports
//!
//! API trait defining what the Wallet Session can do.

use crate::domain::{RemoteKeySnapshot, SessionError};
use async_trait::async_trait;
use serde::Serialize;
use shared_types::entities::{KeyVersion, LocalPrivateKey, WalletAccount};

/// Account and network observed when the session attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Whether the wallet provider is installed.
    pub available: bool,
    /// Authenticated account, if any.
    pub account: Option<WalletAccount>,
    /// Current chain name or id, or `"unknown"`.
    pub network: String,
}

/// Wallet Session API - inbound port.
#[async_trait]
pub trait WalletSessionApi: Send + Sync {
    /// Query the wallet and subscribe to its events.
    ///
    /// A failing network query yields `"unknown"`; a failing account
    /// query aborts with [`SessionError::AccountQuery`].
    async fn initialize(&self) -> Result<SessionSnapshot, SessionError>;

    /// Remove every wallet listener. Safe to call repeatedly.
    fn teardown(&self);

    /// Current account.
    fn current_account(&self) -> Option<WalletAccount>;

    /// Current chain name or id as last reported by the wallet.
    fn current_network(&self) -> String;

    /// Return the authenticated account, asking the user to log in if needed.
    async fn connect_account(&self) -> Result<Option<WalletAccount>, SessionError>;

    /// Disconnect `account` from this client.
    async fn disconnect_account(&self, account: &WalletAccount) -> Result<(), SessionError>;

    /// Derive a new local key for `account`.
    async fn construct_local_key(
        &self,
        account: &WalletAccount,
        version: KeyVersion,
        password: Option<String>,
    ) -> Result<LocalPrivateKey, SessionError>;

    /// Read the account's published keys on every network.
    async fn read_remote_keys(&self, account: &WalletAccount) -> RemoteKeySnapshot;
}
