//! # Network Scenarios
//!
//! Wallet session (1) network signals reaching the network
//! coordinator (2) through the event router.

#[cfg(test)]
mod tests {
    use super::super::harness::*;

    use shared_types::networks::EvmNetwork;
    use ya_02_network_coordinator::{NetworkCoordinatorApi, ADD_CHAIN_METHOD, SWITCH_CHAIN_METHOD};

    #[tokio::test]
    async fn test_start_attaches_current_network() {
        let session = SandboxSession::new();
        session.start().await;

        assert_eq!(
            session.container.coordinator.active_network(),
            Some(EvmNetwork::Gnosis)
        );
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_wallet_chain_change_is_tracked() {
        let session = SandboxSession::new();
        session.start().await;
        let coordinator = &session.container.coordinator;

        session.sandbox.wallet.switch_blockchain("0xfa");
        assert!(
            eventually(|| async move { coordinator.active_network() == Some(EvmNetwork::Fantom) })
                .await
        );

        session.sandbox.wallet.switch_blockchain("some-testnet");
        assert!(eventually(|| async move { coordinator.active_network().is_none() }).await);
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_switch_adds_then_switches_chain() {
        let session = SandboxSession::new();
        session.start().await;

        session
            .container
            .coordinator
            .request_network_switch(EvmNetwork::Polygon)
            .await
            .unwrap();

        let methods: Vec<String> = session
            .sandbox
            .wallet
            .provider_requests()
            .into_iter()
            .map(|(method, _)| method)
            .collect();
        assert_eq!(methods, vec![ADD_CHAIN_METHOD, SWITCH_CHAIN_METHOD]);
        assert_eq!(
            session.container.coordinator.active_network(),
            Some(EvmNetwork::Polygon)
        );
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_wallet_switch_request_failure_notifies() {
        let session = SandboxSession::new();
        let mut notices = session.notices();
        session.start().await;
        session.sandbox.wallet.set_reject_switch(true);

        let switched = session
            .container
            .coordinator
            .handle_switch_request("sign", Some(EvmNetwork::Gnosis), EvmNetwork::Ethereum)
            .await;

        assert!(!switched);
        assert_eq!(
            drain_notices(&mut notices),
            vec!["Wrong network (GNOSIS), switch to ETHEREUM".to_string()]
        );
        session.shutdown().await;
    }
}
