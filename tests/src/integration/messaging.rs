//! # Messaging Scenarios
//!
//! Messaging (5) preconditions come from the authorization state
//! machine (4) and the network coordinator (2) through the runtime's
//! context adapter.

#[cfg(test)]
mod tests {
    use super::super::harness::*;

    use shared_bus::{EventFilter, EventTopic, InputKind, SessionEvent};
    use shared_types::entities::{
        Address, AuthorizationState, ExternalIdentity, MessageEnvelope, OutgoingContent,
        WalletAccount,
    };
    use shared_types::networks::EvmNetwork;
    use shared_types::sandbox::SentMessage;
    use tokio_test::{assert_err, assert_ok};
    use ya_02_network_coordinator::{NetworkCoordinatorApi, SWITCH_CHAIN_METHOD};
    use ya_04_authorization::AuthorizationApi;
    use ya_05_messaging::{MessagingApi, MessagingError, CONTENT_UNAVAILABLE_NOTICE};
    use ya_runtime::ServiceConfig;

    fn carol() -> WalletAccount {
        WalletAccount::evm("0x00000000000000000000000000000000000ca201")
    }

    fn hello() -> OutgoingContent {
        OutgoingContent {
            subject: "hi".into(),
            content: "from the integration suite".into(),
        }
    }

    async fn authorized_session() -> SandboxSession {
        let session = SandboxSession::new();
        session.start().await;
        session.login(&carol(), AuthorizationState::Authorized).await;
        session
    }

    #[tokio::test]
    async fn test_send_without_account() {
        let session = SandboxSession::new();
        session.start().await;

        let result = session
            .container
            .messaging
            .send_message(vec![Address::new("0xb0b")], hello())
            .await;

        assert_eq!(result, Err(MessagingError::NoAccount));
        assert!(session.sandbox.message_core.sent().is_empty());
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_send_before_identity_is_bound() {
        let mut config = ServiceConfig::for_testing();
        config.auth.require_identity = true;
        let session = SandboxSession::with_config(config);
        session.start().await;
        session.sandbox.wallet.login(carol());
        let s = &session;
        assert!(
            eventually(|| async move {
                s.container.auth.wallet_account() == Some(carol())
                    && s.state() == AuthorizationState::NotAuthorized
            })
            .await
        );

        let result = session
            .container
            .messaging
            .send_message(vec![Address::new("0xb0b")], hello())
            .await;
        assert_eq!(
            result,
            Err(MessagingError::NotAuthorized {
                state: AuthorizationState::NotAuthorized
            })
        );

        session.runtime.bind_identity(Some(ExternalIdentity {
            account: carol().address.to_string(),
            identifier: "did:ylide:carol".into(),
        }));
        assert!(session.wait_for(AuthorizationState::Authorized).await);
        assert_ok!(
            session
                .container
                .messaging
                .send_message(vec![Address::new("0xb0b")], hello())
                .await
        );
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_send_returns_tx_and_announces_it() {
        let session = authorized_session().await;
        let mut activity = session
            .container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Activity]));

        let outcome = session
            .container
            .messaging
            .send_message(vec![Address::new("0xb0b"), Address::new("0xd0d")], hello())
            .await
            .unwrap();

        assert!(outcome.tx_hash.starts_with("0x"));
        assert_eq!(outcome.blockchain, "GNOSIS");
        match &session.sandbox.message_core.sent()[..] {
            [SentMessage::Mail(request, EvmNetwork::Gnosis)] => {
                assert_eq!(request.recipients.len(), 2);
                assert_eq!(request.sender, carol());
            }
            other => panic!("unexpected writes: {other:?}"),
        }
        assert!(activity.drain().contains(&SessionEvent::MessageSent {
            network: "GNOSIS".into(),
            broadcast: false,
            tx_hash: outcome.tx_hash,
        }));
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_write_failure_surfaces() {
        let session = authorized_session().await;
        session.sandbox.message_core.set_fail_writes(true);

        let err = assert_err!(
            session
                .container
                .messaging
                .send_message(vec![Address::new("0xb0b")], hello())
                .await
        );
        assert!(matches!(err, MessagingError::Write(_)));
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_broadcast_on_explicit_network_switches_wallet() {
        let session = authorized_session().await;

        let outcome = session
            .container
            .messaging
            .broadcast_message(hello(), Some(EvmNetwork::Polygon))
            .await
            .unwrap();

        assert_eq!(outcome.blockchain, "POLYGON");
        assert_eq!(
            session.container.coordinator.active_network(),
            Some(EvmNetwork::Polygon)
        );
        assert!(session
            .sandbox
            .wallet
            .provider_requests()
            .iter()
            .any(|(method, _)| method == SWITCH_CHAIN_METHOD));
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_broadcast_refused_switch() {
        let session = authorized_session().await;
        session.sandbox.wallet.set_reject_switch(true);

        let result = session
            .container
            .messaging
            .broadcast_message(hello(), Some(EvmNetwork::Fantom))
            .await;

        assert_eq!(
            result,
            Err(MessagingError::SwitchFailed {
                network: EvmNetwork::Fantom
            })
        );
        assert!(session.sandbox.message_core.sent().is_empty());
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_broadcast_asks_for_network() {
        let session = authorized_session().await;
        let ui = session.script_ui(vec![network(EvmNetwork::Fantom)]);

        let outcome = session
            .container
            .messaging
            .broadcast_message(hello(), None)
            .await
            .unwrap();

        assert_eq!(outcome.blockchain, "FANTOM");
        assert_eq!(ui.prompts(), vec![InputKind::NetworkChoice]);
        match &session.sandbox.message_core.sent()[..] {
            [SentMessage::Broadcast(request, EvmNetwork::Fantom)] => {
                assert!(request.is_personal);
            }
            other => panic!("unexpected writes: {other:?}"),
        }
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_broadcast_choice_cancelled() {
        let session = authorized_session().await;
        let _ui = session.script_ui(vec![None]);

        let result = session
            .container
            .messaging
            .broadcast_message(hello(), None)
            .await;

        assert_eq!(result, Err(MessagingError::NetworkNotSelected));
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_decode_stored_and_missing_content() {
        let session = authorized_session().await;
        let mut notices = session.notices();
        session
            .sandbox
            .message_core
            .store_content("m-1", "subject", "body", false);
        let envelope = |id: &str| MessageEnvelope {
            msg_id: id.into(),
            is_broadcast: false,
            sender: Address::new("0xb0b"),
            blockchain: "GNOSIS".into(),
        };

        let decoded = session
            .container
            .messaging
            .decode_message(&envelope("m-1"), &carol())
            .await
            .unwrap();
        assert_eq!(decoded.subject, "subject");
        assert_eq!(decoded.content, "body");

        assert!(session
            .container
            .messaging
            .decode_message(&envelope("m-404"), &carol())
            .await
            .is_none());
        let shown = drain_notices(&mut notices);
        assert_eq!(
            shown
                .iter()
                .filter(|n| *n == CONTENT_UNAVAILABLE_NOTICE)
                .count(),
            1
        );
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_balances_skip_unreachable_networks() {
        let session = SandboxSession::new();
        session.start().await;
        let ledger = &session.sandbox.ledger;
        ledger.set_balance(EvmNetwork::Gnosis, &carol().address, 2.5);
        ledger.set_network_failing(EvmNetwork::Polygon, true);

        let balances = session
            .container
            .messaging
            .get_balances_of(&carol().address)
            .await;

        assert!(!balances.contains_key(&EvmNetwork::Polygon));
        assert_eq!(balances[&EvmNetwork::Gnosis].numeric, 2.5);
        assert_eq!(balances.len(), EvmNetwork::ALL.len() - 1);
        session.shutdown().await;
    }
}
