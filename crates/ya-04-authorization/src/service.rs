//! # Authorization State Machine Service
//!
//! Holds the session view the decision list reads and runs the
//! authorization flows.
//!
//! ## Concurrency
//!
//! - Session state sits behind a `parking_lot::RwLock` that is never held
//!   across an `.await`.
//! - Every account update bumps a generation counter. A fetch or flow that
//!   started under an older generation has its results discarded.
//! - At most one flow (automatic or forced) runs at a time. A recompute
//!   that finds a flow running leaves a rerun mark for it and returns.
//!
//! ## Automatic flow
//!
//! ```text
//! NO_REMOTE_KEY, or HAS_REMOTE_BUT_NO_LOCAL_KEY with a V3 remote
//!     └─→ derive V3 → save → publish (faucet) → settle → re-read remote
//! ```

use crate::config::AuthConfig;
use crate::domain::{
    compute_authorization_state, is_password_needed, select_key_version, AuthError,
    AuthSnapshot,
};
use crate::ports::{AuthInteraction, AuthorizationApi, KeyPublication, KeySource};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{Notice, SessionEvent};
use shared_types::collaborators::KeyRegistry;
use shared_types::entities::{
    Address, AuthorizationState, ExternalIdentity, LocalPrivateKey, RemotePublicKey,
    WalletAccount,
};
use shared_types::networks::EvmNetwork;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Notice shown once the session reaches `AUTHORIZED`.
pub const AUTHORIZED_NOTICE: &str = "Ylide is authorized";

/// Notice shown when a password derives a key other than the published one.
pub const WRONG_PASSWORD_NOTICE: &str = "Wrong password, please, try again";

#[derive(Debug)]
struct MachineState {
    snapshot: AuthSnapshot,
    identity: Option<ExternalIdentity>,
    generation: u64,
    reported: AuthorizationState,
}

/// Authorization State Machine - derives and drives the authorization state.
pub struct AuthorizationStateMachine {
    keys: Arc<dyn KeySource>,
    publisher: Arc<dyn KeyPublication>,
    registry: Arc<dyn KeyRegistry>,
    interaction: Arc<dyn AuthInteraction>,
    config: AuthConfig,
    state: RwLock<MachineState>,
    flow: tokio::sync::Mutex<()>,
    rerun: AtomicBool,
}

impl AuthorizationStateMachine {
    /// Create a machine in the `LOADING` state.
    pub fn new(
        keys: Arc<dyn KeySource>,
        publisher: Arc<dyn KeyPublication>,
        registry: Arc<dyn KeyRegistry>,
        interaction: Arc<dyn AuthInteraction>,
        config: AuthConfig,
    ) -> Self {
        let snapshot = AuthSnapshot {
            identity_verified: !config.require_identity,
            ..AuthSnapshot::default()
        };
        let reported = compute_authorization_state(&snapshot);
        Self {
            keys,
            publisher,
            registry,
            interaction,
            config,
            state: RwLock::new(MachineState {
                snapshot,
                identity: None,
                generation: 0,
                reported,
            }),
            flow: tokio::sync::Mutex::new(()),
            rerun: AtomicBool::new(false),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Initialize the key registry and bind the account the wallet reported
    /// when the session attached.
    pub async fn initialize(&self, account: Option<WalletAccount>) -> AuthorizationState {
        if let Err(e) = self.registry.init().await {
            warn!(error = %e, "Key registry initialization failed");
        }
        self.apply_account(account, true).await
    }

    /// Bind or unbind the external identity.
    pub fn bind_identity(&self, identity: Option<ExternalIdentity>) -> AuthorizationState {
        let require = self.config.require_identity;
        self.mutate(|s| {
            s.snapshot.identity_verified = identity.is_some() || !require;
            s.identity = identity;
        });
        self.get_authorization_state()
    }

    /// Bound external identity.
    pub fn identity(&self) -> Option<ExternalIdentity> {
        self.state.read().identity.clone()
    }

    /// Local keys held for the current account.
    pub fn local_keys(&self) -> Vec<LocalPrivateKey> {
        self.state.read().snapshot.local_keys.clone()
    }

    /// Apply `f` to the state, then report a state change if there was one.
    fn mutate<R>(&self, f: impl FnOnce(&mut MachineState) -> R) -> R {
        let (result, transition) = {
            let mut s = self.state.write();
            let result = f(&mut s);
            let next = compute_authorization_state(&s.snapshot);
            let transition = (next != s.reported).then(|| {
                let from = std::mem::replace(&mut s.reported, next);
                let address = s.snapshot.account.as_ref().map(|a| a.address.clone());
                (address, from, next)
            });
            (result, transition)
        };

        if let Some((address, from, to)) = transition {
            info!(
                address = address.as_ref().map(Address::as_str).unwrap_or("-"),
                from = %from,
                to = %to,
                "Authorization state changed"
            );
            self.interaction.state_changed(address.as_ref(), from, to);
        }
        result
    }

    fn binding(&self) -> Option<(WalletAccount, u64)> {
        let s = self.state.read();
        s.snapshot
            .account
            .clone()
            .map(|account| (account, s.generation))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.read().generation == generation
    }

    async fn apply_account(
        &self,
        account: Option<WalletAccount>,
        initializing: bool,
    ) -> AuthorizationState {
        let generation = self.mutate(|s| {
            if !initializing && s.snapshot.initialized && s.snapshot.account == account {
                return None;
            }
            s.generation += 1;
            s.snapshot.initialized |= initializing;
            s.snapshot.loading = account.is_some();
            s.snapshot.remote_key = None;
            s.snapshot.local_keys = account
                .as_ref()
                .map(|a| self.registry.get_local_private_keys(&a.address))
                .unwrap_or_default();
            s.snapshot.account = account.clone();
            Some(s.generation)
        });

        let Some(generation) = generation else {
            debug!("Account unchanged, update ignored");
            return self.get_authorization_state();
        };

        if let Some(account) = account {
            let remote = self.keys.read_remote_key(&account).await;
            if !self.apply_remote(generation, &account, remote) {
                debug!(address = %account.address, "Discarding remote key for superseded account");
            }
        }
        self.get_authorization_state()
    }

    fn apply_remote(
        &self,
        generation: u64,
        account: &WalletAccount,
        remote: Option<RemotePublicKey>,
    ) -> bool {
        self.mutate(|s| {
            if s.generation != generation || s.snapshot.account.as_ref() != Some(account) {
                return false;
            }
            s.snapshot.remote_key = remote;
            s.snapshot.loading = false;
            true
        })
    }

    /// Derive, save and publish a passwordless key, then re-read the remote key.
    async fn establish_passwordless_key(&self) -> Result<AuthorizationState, AuthError> {
        let (account, generation) = self.binding().ok_or(AuthError::NoAccount)?;

        let key = self.create_local_key(None, false).await?;
        if !self.is_current(generation) {
            return Err(AuthError::Superseded);
        }
        self.save_local_key(key.clone()).await?;

        let network = self.config.publish_network;
        if !self.publish_local_key(network, &key, &account).await {
            self.interaction.notify(Notice::error(format!(
                "Could not publish your messaging key on {network}"
            )));
            return Err(AuthError::PublicationFailed { network });
        }

        tokio::time::sleep(self.config.settle_delay()).await;

        let remote = self.keys.read_remote_key(&account).await;
        if !self.apply_remote(generation, &account, remote) {
            return Err(AuthError::Superseded);
        }

        let state = self.get_authorization_state();
        if state == AuthorizationState::Authorized {
            self.interaction.notify(Notice::success(AUTHORIZED_NOTICE));
        }
        Ok(state)
    }

    /// Prompt until the password derives the published key or the user
    /// closes the prompt.
    async fn password_flow(&self) -> bool {
        let Some((account, generation)) = self.binding() else {
            return false;
        };
        let mut retry = false;

        loop {
            let Some(password) = self
                .interaction
                .request_password(&account.address, retry)
                .await
            else {
                debug!(address = %account.address, "Password prompt closed");
                return false;
            };

            let key = match self.create_local_key(Some(password), false).await {
                Ok(key) => key,
                Err(e) => {
                    warn!(address = %account.address, error = %e, "Key derivation failed");
                    return false;
                }
            };
            if !self.is_current(generation) {
                return false;
            }
            let Some(remote) = self.remote_key() else {
                return false;
            };

            if key.public_key.same_bytes(&remote.public_key) {
                if let Err(e) = self.save_local_key(key).await {
                    warn!(address = %account.address, error = %e, "Saving recovered key failed");
                    return false;
                }
                let authorized = self.get_authorization_state() == AuthorizationState::Authorized;
                if authorized {
                    self.interaction.notify(Notice::success(AUTHORIZED_NOTICE));
                }
                return authorized;
            }

            warn!(address = %account.address, "Derived key does not match the published key");
            self.interaction.notify(Notice::error(WRONG_PASSWORD_NOTICE));
            retry = true;
        }
    }

    async fn drive_once(&self) {
        let state = self.get_authorization_state();
        if !state.needs_key() {
            return;
        }
        if self.is_password_needed() {
            debug!(state = %state, "Published key needs a password, waiting for the user");
            return;
        }
        match self.establish_passwordless_key().await {
            Ok(state) => debug!(state = %state, "Automatic authorization finished"),
            Err(AuthError::Superseded) => {
                debug!("Automatic authorization superseded by account change")
            }
            Err(e) => warn!(error = %e, "Automatic authorization failed"),
        }
    }
}

#[async_trait]
impl AuthorizationApi for AuthorizationStateMachine {
    fn get_authorization_state(&self) -> AuthorizationState {
        compute_authorization_state(&self.state.read().snapshot)
    }

    async fn handle_event(&self, event: &SessionEvent) -> AuthorizationState {
        match event {
            SessionEvent::AccountUpdate(account) => self.apply_account(account.clone(), false).await,
            SessionEvent::IdentityBound(identity) => self.bind_identity(identity.clone()),
            _ => self.get_authorization_state(),
        }
    }

    async fn recompute(&self) -> AuthorizationState {
        self.rerun.store(true, Ordering::SeqCst);
        loop {
            let Ok(guard) = self.flow.try_lock() else {
                debug!("Authorization flow running, recompute deferred to it");
                break;
            };
            while self.rerun.swap(false, Ordering::SeqCst) {
                self.drive_once().await;
            }
            drop(guard);
            if !self.rerun.load(Ordering::SeqCst) {
                break;
            }
        }
        self.get_authorization_state()
    }

    async fn force_authorize(&self) -> bool {
        let guard = self.flow.lock().await;
        let state = self.get_authorization_state();
        let authorized = match state {
            AuthorizationState::Authorized => true,
            s if s.needs_key() => {
                if self.is_password_needed() {
                    self.password_flow().await
                } else {
                    matches!(
                        self.establish_passwordless_key().await,
                        Ok(AuthorizationState::Authorized)
                    )
                }
            }
            other => {
                debug!(state = %other, "Nothing to authorize");
                false
            }
        };
        drop(guard);

        if self.rerun.load(Ordering::SeqCst) {
            self.recompute().await;
        }
        authorized
    }

    async fn create_local_key(
        &self,
        password: Option<String>,
        force_new: bool,
    ) -> Result<LocalPrivateKey, AuthError> {
        let (account, remote_version) = {
            let s = self.state.read();
            let account = s.snapshot.account.clone().ok_or(AuthError::NoAccount)?;
            (account, s.snapshot.remote_key.as_ref().map(|k| k.key_version()))
        };

        let version = select_key_version(force_new, remote_version);
        let password = match (version.requires_password(), password) {
            (true, None) => return Err(AuthError::PasswordRequired),
            (true, password) => password,
            (false, _) => None,
        };

        debug!(address = %account.address, version = version.as_u8(), "Deriving local key");
        self.keys
            .construct_local_key(&account, version, password)
            .await
            .map_err(AuthError::KeyCreation)
    }

    async fn save_local_key(&self, key: LocalPrivateKey) -> Result<(), AuthError> {
        self.registry
            .add_local_private_key(key.clone())
            .await
            .map_err(AuthError::Registry)?;

        let keys = self.registry.get_local_private_keys(&key.address);
        self.mutate(|s| {
            if s.snapshot.account.as_ref().map(|a| &a.address) == Some(&key.address) {
                s.snapshot.local_keys = keys;
            }
        });
        Ok(())
    }

    async fn publish_local_key(
        &self,
        network: EvmNetwork,
        key: &LocalPrivateKey,
        account: &WalletAccount,
    ) -> bool {
        self.publisher
            .publish(account, &key.public_key, network)
            .await
    }

    async fn reload_remote_keys(&self) -> Option<RemotePublicKey> {
        let (account, generation) = self.binding()?;
        let remote = self.keys.read_remote_key(&account).await;
        if !self.apply_remote(generation, &account, remote) {
            debug!(address = %account.address, "Discarding remote key for superseded account");
        }
        self.remote_key()
    }

    fn is_password_needed(&self) -> bool {
        is_password_needed(self.state.read().snapshot.remote_key.as_ref())
    }

    fn remote_key(&self) -> Option<RemotePublicKey> {
        self.state.read().snapshot.remote_key.clone()
    }

    fn wallet_account(&self) -> Option<WalletAccount> {
        self.state.read().snapshot.account.clone()
    }

    fn is_loading(&self) -> bool {
        self.state.read().snapshot.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockKeySource, MockPublication, ScriptedInteraction};
    use shared_bus::NoticeLevel;
    use shared_types::entities::KeyVersion;
    use shared_types::sandbox::InMemoryKeyRegistry;
    use std::time::Duration;

    struct Fixture {
        keys: Arc<MockKeySource>,
        publisher: Arc<MockPublication>,
        registry: Arc<InMemoryKeyRegistry>,
        interaction: Arc<ScriptedInteraction>,
        machine: Arc<AuthorizationStateMachine>,
    }

    fn fixture_with(config: AuthConfig) -> Fixture {
        let keys = MockKeySource::new();
        let publisher = Arc::new(MockPublication::new(Arc::clone(&keys)));
        let registry = InMemoryKeyRegistry::new();
        let interaction = Arc::new(ScriptedInteraction::default());
        let machine = Arc::new(AuthorizationStateMachine::new(
            keys.clone(),
            publisher.clone(),
            registry.clone(),
            interaction.clone(),
            config,
        ));
        Fixture {
            keys,
            publisher,
            registry,
            interaction,
            machine,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(AuthConfig::for_testing())
    }

    fn alice() -> WalletAccount {
        WalletAccount::evm("0xa11ce")
    }

    fn bob() -> WalletAccount {
        WalletAccount::evm("0xb0b")
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let f = fixture();
        assert_eq!(f.machine.get_authorization_state(), AuthorizationState::Loading);
    }

    #[tokio::test]
    async fn test_initialize_without_account() {
        let f = fixture();
        assert_eq!(
            f.machine.initialize(None).await,
            AuthorizationState::NotAuthorized
        );
        assert!(f.registry.is_initialized());
    }

    #[tokio::test]
    async fn test_identity_gate() {
        let f = fixture_with(AuthConfig {
            require_identity: true,
            ..AuthConfig::for_testing()
        });
        f.machine.initialize(Some(alice())).await;
        assert_eq!(
            f.machine.get_authorization_state(),
            AuthorizationState::NotAuthorized
        );

        let state = f.machine.bind_identity(Some(ExternalIdentity {
            account: alice().address.to_string(),
            identifier: "did:example:alice".into(),
        }));
        assert_eq!(state, AuthorizationState::NoRemoteKey);
    }

    #[tokio::test]
    async fn test_auto_flow_publishes_v3() {
        let f = fixture();
        f.machine.initialize(Some(alice())).await;
        assert_eq!(
            f.machine.get_authorization_state(),
            AuthorizationState::NoRemoteKey
        );

        let state = f.machine.recompute().await;

        assert_eq!(state, AuthorizationState::Authorized);
        assert_eq!(f.keys.derivations(), vec![(alice().address, KeyVersion::V3)]);
        assert_eq!(f.publisher.calls(), vec![(alice().address, EvmNetwork::Gnosis)]);
        assert_eq!(f.interaction.messages(), vec![AUTHORIZED_NOTICE.to_string()]);
        assert_eq!(
            f.interaction.transitions().last(),
            Some(&(
                AuthorizationState::NoRemoteKey,
                AuthorizationState::Authorized
            ))
        );
    }

    #[tokio::test]
    async fn test_auto_flow_recovers_v3_key() {
        let f = fixture();
        f.keys
            .publish_derived(&alice().address, KeyVersion::V3, None);
        f.machine.initialize(Some(alice())).await;
        assert_eq!(
            f.machine.get_authorization_state(),
            AuthorizationState::HasRemoteButNoLocalKey
        );

        assert_eq!(f.machine.recompute().await, AuthorizationState::Authorized);
        assert_eq!(f.keys.derivations(), vec![(alice().address, KeyVersion::V3)]);
        assert!(f
            .machine
            .remote_key()
            .is_some_and(|k| k.key_version() == KeyVersion::V3));
    }

    #[tokio::test]
    async fn test_password_key_waits_for_user() {
        let f = fixture();
        f.keys
            .publish_derived(&alice().address, KeyVersion::V2, Some("secret"));
        f.machine.initialize(Some(alice())).await;

        assert!(f.machine.is_password_needed());
        assert_eq!(
            f.machine.recompute().await,
            AuthorizationState::HasRemoteButNoLocalKey
        );
        assert!(f.keys.derivations().is_empty());
        assert!(f.interaction.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_then_right_password() {
        let f = fixture();
        f.keys
            .publish_derived(&alice().address, KeyVersion::V2, Some("secret"));
        f.machine.initialize(Some(alice())).await;
        f.interaction.push_password(Some("guess"));
        f.interaction.push_password(Some("secret"));

        assert!(f.machine.force_authorize().await);

        assert_eq!(
            f.interaction.prompts(),
            vec![(alice().address, false), (alice().address, true)]
        );
        assert_eq!(
            f.interaction.messages(),
            vec![
                WRONG_PASSWORD_NOTICE.to_string(),
                AUTHORIZED_NOTICE.to_string()
            ]
        );
        assert_eq!(f.registry.get_local_private_keys(&alice().address).len(), 1);
        assert!(f.publisher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_password_prompt() {
        let f = fixture();
        f.keys
            .publish_derived(&alice().address, KeyVersion::InsecureV1, Some("pw"));
        f.machine.initialize(Some(alice())).await;
        f.interaction.push_password(None);

        assert!(!f.machine.force_authorize().await);
        assert!(f.registry.get_local_private_keys(&alice().address).is_empty());
        assert_eq!(
            f.machine.get_authorization_state(),
            AuthorizationState::HasRemoteButNoLocalKey
        );
    }

    #[tokio::test]
    async fn test_force_when_authorized_is_true() {
        let f = fixture();
        f.machine.initialize(Some(alice())).await;
        f.machine.recompute().await;

        assert!(f.machine.force_authorize().await);
        assert_eq!(f.publisher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_force_without_account_is_false() {
        let f = fixture();
        f.machine.initialize(None).await;
        assert!(!f.machine.force_authorize().await);
    }

    #[tokio::test]
    async fn test_mismatch_is_not_forced() {
        let f = fixture();
        f.keys
            .publish_derived(&alice().address, KeyVersion::V3, None);
        f.machine.initialize(Some(alice())).await;
        let stale = f
            .machine
            .create_local_key(Some("old".into()), true)
            .await
            .unwrap();
        f.machine.save_local_key(stale).await.unwrap();

        assert_eq!(
            f.machine.get_authorization_state(),
            AuthorizationState::LocalRemoteMismatch
        );
        assert!(!f.machine.force_authorize().await);
    }

    #[tokio::test]
    async fn test_publication_failure_reports_and_stops() {
        let f = fixture();
        f.publisher.set_succeed(false);
        f.machine.initialize(Some(alice())).await;

        let state = f.machine.recompute().await;

        assert_eq!(state, AuthorizationState::NoRemoteKey);
        assert_eq!(f.publisher.calls().len(), 1);
        let notices = f.interaction.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_rejected_signature_leaves_state() {
        let f = fixture();
        f.keys.set_fail_derivation(true);
        f.machine.initialize(Some(alice())).await;

        assert_eq!(f.machine.recompute().await, AuthorizationState::NoRemoteKey);
        assert!(f.publisher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_local_key_policy() {
        let f = fixture();
        assert_eq!(
            f.machine.create_local_key(None, false).await,
            Err(AuthError::NoAccount)
        );

        f.keys
            .publish_derived(&alice().address, KeyVersion::V2, Some("pw"));
        f.machine.initialize(Some(alice())).await;
        assert_eq!(
            f.machine.create_local_key(None, false).await,
            Err(AuthError::PasswordRequired)
        );
        let key = f
            .machine
            .create_local_key(Some("pw".into()), false)
            .await
            .unwrap();
        assert_eq!(key.key_version(), KeyVersion::V2);
    }

    #[tokio::test]
    async fn test_save_refreshes_local_keys() {
        let f = fixture();
        f.machine.initialize(Some(alice())).await;
        let key = f.machine.create_local_key(None, false).await.unwrap();

        f.machine.save_local_key(key.clone()).await.unwrap();
        assert_eq!(f.machine.local_keys(), vec![key]);
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let f = fixture();
        f.keys
            .publish_derived(&alice().address, KeyVersion::V3, None);
        f.machine.initialize(Some(alice())).await;

        let first = f.machine.reload_remote_keys().await;
        let second = f.machine.reload_remote_keys().await;
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_duplicate_account_update_ignored() {
        let f = fixture();
        f.machine.initialize(Some(alice())).await;
        let before = f.interaction.transitions().len();

        f.machine
            .handle_event(&SessionEvent::AccountUpdate(Some(alice())))
            .await;
        assert_eq!(f.interaction.transitions().len(), before);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let f = fixture();
        f.machine.initialize(Some(alice())).await;
        f.machine.recompute().await;

        let state = f
            .machine
            .handle_event(&SessionEvent::AccountUpdate(None))
            .await;
        assert_eq!(state, AuthorizationState::NotAuthorized);
        assert!(f.machine.remote_key().is_none());
        assert!(f.machine.local_keys().is_empty());
    }

    #[tokio::test]
    async fn test_stale_remote_fetch_discarded() {
        let f = fixture();
        f.machine.initialize(None).await;
        f.keys
            .publish_derived(&alice().address, KeyVersion::V3, None);
        f.keys.set_lookup_delay(&alice().address, Duration::from_millis(100));

        let slow = {
            let machine = Arc::clone(&f.machine);
            tokio::spawn(async move {
                machine
                    .handle_event(&SessionEvent::AccountUpdate(Some(alice())))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        f.machine
            .handle_event(&SessionEvent::AccountUpdate(Some(bob())))
            .await;
        slow.await.unwrap();

        assert_eq!(f.machine.wallet_account(), Some(bob()));
        assert!(f.machine.remote_key().is_none());
        assert_eq!(
            f.machine.get_authorization_state(),
            AuthorizationState::NoRemoteKey
        );
    }

    #[tokio::test]
    async fn test_account_switch_during_flow() {
        let f = fixture_with(AuthConfig {
            settle_delay_ms: 100,
            ..AuthConfig::for_testing()
        });
        f.machine.initialize(Some(alice())).await;

        let flow = {
            let machine = Arc::clone(&f.machine);
            tokio::spawn(async move { machine.recompute().await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        f.machine
            .handle_event(&SessionEvent::AccountUpdate(Some(bob())))
            .await;
        // Collapses into the running flow, which re-runs for the new account.
        f.machine.recompute().await;
        flow.await.unwrap();

        assert_eq!(f.machine.wallet_account(), Some(bob()));
        let remote = f.machine.remote_key().unwrap();
        assert_eq!(remote.address, bob().address);
        assert_eq!(
            f.machine.get_authorization_state(),
            AuthorizationState::Authorized
        );
        assert_eq!(
            f.publisher.calls(),
            vec![
                (alice().address, EvmNetwork::Gnosis),
                (bob().address, EvmNetwork::Gnosis)
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_recompute_runs_one_flow() {
        let f = fixture_with(AuthConfig {
            settle_delay_ms: 50,
            ..AuthConfig::for_testing()
        });
        f.machine.initialize(Some(alice())).await;

        let (a, b) = tokio::join!(f.machine.recompute(), f.machine.recompute());
        let _ = (a, b);

        assert_eq!(f.publisher.calls().len(), 1);
        assert_eq!(
            f.machine.get_authorization_state(),
            AuthorizationState::Authorized
        );
    }
}
