//! # Authorization Decision List
//!
//! Derives [`AuthorizationState`] from a snapshot of session state. The
//! first matching rule wins:
//!
//! 1. not initialized, or a fetch in flight → `LOADING`
//! 2. no account, or no verified identity  → `NOT_AUTHORIZED`
//! 3. nothing published                     → `NO_REMOTE_KEY`
//! 4. no local key for the published address → `HAS_REMOTE_BUT_NO_LOCAL_KEY`
//! 5. no local key with the published bytes → `LOCAL_REMOTE_MISMATCH`
//! 6. otherwise                              → `AUTHORIZED`

use shared_types::entities::{
    AuthorizationState, LocalPrivateKey, RemotePublicKey, WalletAccount,
};

/// Everything the decision list reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// Registry initialized and wallet attached.
    pub initialized: bool,
    /// A remote key fetch for the current account is in flight.
    pub loading: bool,
    /// Current wallet account.
    pub account: Option<WalletAccount>,
    /// An external identity is bound, or none is required.
    pub identity_verified: bool,
    /// Freshest published key for the account.
    pub remote_key: Option<RemotePublicKey>,
    /// Local keys held for the account's address.
    pub local_keys: Vec<LocalPrivateKey>,
}

/// Evaluate the decision list.
#[must_use]
pub fn compute_authorization_state(snapshot: &AuthSnapshot) -> AuthorizationState {
    if !snapshot.initialized || snapshot.loading {
        return AuthorizationState::Loading;
    }
    if snapshot.account.is_none() || !snapshot.identity_verified {
        return AuthorizationState::NotAuthorized;
    }
    let Some(remote) = &snapshot.remote_key else {
        return AuthorizationState::NoRemoteKey;
    };

    let mut candidates = snapshot
        .local_keys
        .iter()
        .filter(|key| key.address == remote.address)
        .peekable();
    if candidates.peek().is_none() {
        return AuthorizationState::HasRemoteButNoLocalKey;
    }
    if candidates.any(|key| key.public_key.same_bytes(&remote.public_key)) {
        AuthorizationState::Authorized
    } else {
        AuthorizationState::LocalRemoteMismatch
    }
}
