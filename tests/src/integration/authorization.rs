//! # Authorization Scenarios
//!
//! Wallet session (1) → event router → authorization state machine (4)
//! → faucet publisher (3), all over the sandbox ledger.

#[cfg(test)]
mod tests {
    use super::super::harness::*;

    use shared_bus::InputKind;
    use shared_types::entities::{AuthorizationState, KeyVersion, WalletAccount};
    use shared_types::networks::EvmNetwork;
    use ya_04_authorization::{AuthError, AuthorizationApi, AUTHORIZED_NOTICE, WRONG_PASSWORD_NOTICE};

    fn alice() -> WalletAccount {
        WalletAccount::evm("0x00000000000000000000000000000000000a11ce")
    }

    fn bob() -> WalletAccount {
        WalletAccount::evm("0x0000000000000000000000000000000000000b0b")
    }

    // =========================================================================
    // AUTOMATIC (PASSWORDLESS) AUTHORIZATION
    // =========================================================================

    #[tokio::test]
    async fn test_fresh_account_gets_v3_key_published() {
        let session = SandboxSession::new();
        let mut notices = session.notices();
        session.start().await;

        session.login(&alice(), AuthorizationState::Authorized).await;

        let published = session
            .sandbox
            .ledger
            .keys_for(EvmNetwork::Gnosis, &alice().address);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].key_version(), KeyVersion::V3);

        let local = session.container.auth.local_keys();
        assert!(local
            .iter()
            .any(|k| k.public_key.same_bytes(&published[0].public_key)));
        assert!(
            eventually(|| {
                let shown = drain_notices(&mut notices).contains(&AUTHORIZED_NOTICE.to_string());
                async move { shown }
            })
            .await
        );
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_existing_v3_key_is_recovered() {
        let session = SandboxSession::new();
        session.start().await;
        let key = session.derive_key(&alice(), KeyVersion::V3, None).await;
        session.publish_remote(EvmNetwork::Polygon, &alice(), key.clone());

        session.login(&alice(), AuthorizationState::Authorized).await;

        assert!(session
            .container
            .auth
            .local_keys()
            .iter()
            .any(|k| k.public_key.same_bytes(&key)));
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_publication_leaves_no_remote_key() {
        let session = SandboxSession::new();
        let mut notices = session.notices();
        session
            .sandbox
            .wallet
            .set_faucet_failure(Some(shared_types::sandbox::FaucetFailure::Attach));
        session.start().await;

        session.login(&alice(), AuthorizationState::NoRemoteKey).await;

        assert!(
            eventually(|| {
                let shown = drain_notices(&mut notices)
                    .iter()
                    .any(|n| n.contains("Could not publish"));
                async move { shown }
            })
            .await
        );
        assert_eq!(session.state(), AuthorizationState::NoRemoteKey);
        session.shutdown().await;
    }

    // =========================================================================
    // PASSWORD FLOW (V1/V2 REMOTE KEYS)
    // =========================================================================

    #[tokio::test]
    async fn test_v2_remote_waits_for_explicit_authorization() {
        let session = SandboxSession::new();
        let ui = session.script_ui(vec![]);
        session.start().await;
        let key = session
            .derive_key(&alice(), KeyVersion::V2, Some("hunter2"))
            .await;
        session.publish_remote(EvmNetwork::Gnosis, &alice(), key);

        session
            .login(&alice(), AuthorizationState::HasRemoteButNoLocalKey)
            .await;

        assert!(session.container.auth.is_password_needed());
        assert!(ui.prompts().is_empty());
        assert_eq!(session.container.broker.pending_count(), 0);
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_wrong_then_right_password() {
        let session = SandboxSession::new();
        let mut notices = session.notices();
        let ui = session.script_ui(vec![password("hunter3"), password("hunter2")]);
        session.start().await;
        let key = session
            .derive_key(&alice(), KeyVersion::V2, Some("hunter2"))
            .await;
        session.publish_remote(EvmNetwork::Gnosis, &alice(), key);
        session
            .login(&alice(), AuthorizationState::HasRemoteButNoLocalKey)
            .await;

        assert!(session.container.auth.force_authorize().await);

        assert_eq!(session.state(), AuthorizationState::Authorized);
        assert_eq!(
            ui.prompts(),
            vec![
                InputKind::Password {
                    address: alice().address,
                    retry: false
                },
                InputKind::Password {
                    address: alice().address,
                    retry: true
                },
            ]
        );
        let shown = drain_notices(&mut notices);
        assert!(shown.contains(&WRONG_PASSWORD_NOTICE.to_string()));
        assert!(shown.contains(&AUTHORIZED_NOTICE.to_string()));
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_closed_password_prompt_aborts() {
        let session = SandboxSession::new();
        let _ui = session.script_ui(vec![None]);
        session.start().await;
        let key = session
            .derive_key(&alice(), KeyVersion::InsecureV1, Some("pw"))
            .await;
        session.publish_remote(EvmNetwork::Fantom, &alice(), key);
        session
            .login(&alice(), AuthorizationState::HasRemoteButNoLocalKey)
            .await;

        assert!(!session.container.auth.force_authorize().await);
        assert_eq!(session.state(), AuthorizationState::HasRemoteButNoLocalKey);
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_create_local_key_needs_password_for_v2_remote() {
        let session = SandboxSession::new();
        session.start().await;
        let key = session
            .derive_key(&alice(), KeyVersion::V2, Some("pw"))
            .await;
        session.publish_remote(EvmNetwork::Gnosis, &alice(), key.clone());
        session
            .login(&alice(), AuthorizationState::HasRemoteButNoLocalKey)
            .await;

        let auth = &session.container.auth;
        assert_eq!(
            auth.create_local_key(None, false).await.unwrap_err(),
            AuthError::PasswordRequired
        );

        let local = auth
            .create_local_key(Some("pw".into()), false)
            .await
            .unwrap();
        assert!(local.public_key.same_bytes(&key));
        auth.save_local_key(local).await.unwrap();
        assert_eq!(auth.get_authorization_state(), AuthorizationState::Authorized);
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_local_key_not_matching_remote_is_mismatch() {
        let session = SandboxSession::new();
        session.start().await;
        let published = session
            .derive_key(&alice(), KeyVersion::V2, Some("new"))
            .await;
        session.publish_remote(EvmNetwork::Gnosis, &alice(), published);
        session
            .login(&alice(), AuthorizationState::HasRemoteButNoLocalKey)
            .await;

        let auth = &session.container.auth;
        let stale = auth
            .create_local_key(Some("old".into()), false)
            .await
            .unwrap();
        auth.save_local_key(stale).await.unwrap();

        assert_eq!(
            auth.get_authorization_state(),
            AuthorizationState::LocalRemoteMismatch
        );
        session.shutdown().await;
    }

    // =========================================================================
    // ACCOUNT CHANGES
    // =========================================================================

    #[tokio::test]
    async fn test_account_switch_settles_on_latest_account() {
        let session = SandboxSession::new();
        session.start().await;

        session.sandbox.wallet.login(alice());
        session.sandbox.wallet.change_account(bob());

        let s = &session;
        assert!(
            eventually(|| async move {
                s.container.auth.wallet_account() == Some(bob())
                    && s.state() == AuthorizationState::Authorized
            })
            .await
        );
        let remote = session.container.auth.remote_key().unwrap();
        assert_eq!(remote.address, bob().address);
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_logout_drops_authorization() {
        let session = SandboxSession::new();
        session.start().await;
        session.login(&alice(), AuthorizationState::Authorized).await;

        session.sandbox.wallet.logout();

        assert!(session.wait_for(AuthorizationState::NotAuthorized).await);
        assert_eq!(session.container.auth.wallet_account(), None);
        assert_eq!(session.container.auth.remote_key(), None);
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let session = SandboxSession::new();
        session.start().await;
        session.login(&alice(), AuthorizationState::Authorized).await;

        let auth = &session.container.auth;
        let first = auth.reload_remote_keys().await;
        let second = auth.reload_remote_keys().await;

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(auth.get_authorization_state(), AuthorizationState::Authorized);
        assert!(!auth.is_loading());
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_declined_signature_keeps_no_remote_key() {
        let session = SandboxSession::new();
        session.sandbox.wallet.set_reject_signatures(true);
        session.start().await;

        session.login(&alice(), AuthorizationState::NoRemoteKey).await;
        // Second recompute with signatures still declined changes nothing.
        session.container.auth.recompute().await;

        assert_eq!(session.state(), AuthorizationState::NoRemoteKey);
        assert!(session.container.auth.local_keys().is_empty());
        session.shutdown().await;
    }
}
