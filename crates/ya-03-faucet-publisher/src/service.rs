//! # Faucet Publisher Service
//!
//! Multi-step relay publication:
//!
//! ```text
//! get_faucet(network)
//!     └─→ authorize_publishing(account, key, registrar)   relay signs allowance
//!           └─→ attach_public_key(allowance)              tx submitted
//!                 └─→ poll get_address_keys(address)      until bytes match
//!                       └─→ add_remote_public_key(key)    cache in registry
//! ```
//!
//! Any step failing ends the attempt with `success: false`.

use crate::config::FaucetConfig;
use crate::domain::{PublishError, PublishOutcome};
use crate::ports::{KeyPublisher, PublicationSink};
use async_trait::async_trait;
use shared_types::collaborators::{BlockchainController, KeyRegistry, WalletController};
use shared_types::entities::{Address, PublicKey, RemotePublicKey, TxHash, WalletAccount};
use shared_types::networks::EvmNetwork;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Faucet Publisher - publishes keys through the relay.
pub struct FaucetPublisher {
    controller: Arc<dyn WalletController>,
    registry: Arc<dyn KeyRegistry>,
    chains: HashMap<EvmNetwork, Arc<dyn BlockchainController>>,
    sink: Arc<dyn PublicationSink>,
    config: FaucetConfig,
}

impl FaucetPublisher {
    /// Create a publisher.
    pub fn new(
        controller: Arc<dyn WalletController>,
        registry: Arc<dyn KeyRegistry>,
        chains: &[Arc<dyn BlockchainController>],
        sink: Arc<dyn PublicationSink>,
        config: FaucetConfig,
    ) -> Self {
        let chains = chains
            .iter()
            .map(|chain| (chain.network(), Arc::clone(chain)))
            .collect();
        Self {
            controller,
            registry,
            chains,
            sink,
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &FaucetConfig {
        &self.config
    }

    async fn try_publish(
        &self,
        account: &WalletAccount,
        public_key: &PublicKey,
        network: EvmNetwork,
    ) -> Result<TxHash, PublishError> {
        let faucet = self
            .controller
            .get_faucet(network)
            .await
            .map_err(|source| PublishError::FaucetUnavailable { network, source })?;

        let allowance = faucet
            .authorize_publishing(account, public_key, self.config.registrar)
            .await
            .map_err(PublishError::Authorization)?;

        let receipt = faucet
            .attach_public_key(allowance)
            .await
            .map_err(PublishError::Attach)?;
        debug!(network = %network, tx_hash = %receipt.tx_hash, "Key attachment submitted");

        let confirmed = self
            .wait_for_key(network, &account.address, public_key)
            .await?;

        self.registry
            .add_remote_public_key(confirmed)
            .await
            .map_err(PublishError::Registry)?;

        Ok(receipt.tx_hash)
    }

    async fn wait_for_key(
        &self,
        network: EvmNetwork,
        address: &Address,
        public_key: &PublicKey,
    ) -> Result<RemotePublicKey, PublishError> {
        let chain = self
            .chains
            .get(&network)
            .ok_or(PublishError::NoChain(network))?;

        let limit = self.config.confirmation_timeout();
        tokio::time::timeout(limit, self.poll_for_key(chain.as_ref(), address, public_key))
            .await
            .map_err(|_| PublishError::ConfirmationTimeout {
                network,
                waited_secs: limit.as_secs(),
            })
    }

    async fn poll_for_key(
        &self,
        chain: &dyn BlockchainController,
        address: &Address,
        public_key: &PublicKey,
    ) -> RemotePublicKey {
        loop {
            match chain.get_address_keys(address).await {
                Ok(keys) => {
                    if let Some(found) = keys
                        .into_iter()
                        .rev()
                        .find(|k| k.public_key.same_bytes(public_key))
                    {
                        return found;
                    }
                }
                Err(e) => {
                    debug!(network = %chain.network(), error = %e, "Confirmation poll failed, retrying");
                }
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}

#[async_trait]
impl KeyPublisher for FaucetPublisher {
    async fn publish(
        &self,
        account: &WalletAccount,
        public_key: &PublicKey,
        network: EvmNetwork,
    ) -> PublishOutcome {
        match self.try_publish(account, public_key, network).await {
            Ok(tx_hash) => {
                info!(
                    address = %account.address,
                    network = %network,
                    tx_hash = %tx_hash,
                    "Public key published"
                );
                self.sink.published(&account.address, network, true);
                PublishOutcome::confirmed(tx_hash)
            }
            Err(e) => {
                error!(
                    address = %account.address,
                    network = %network,
                    error = %e,
                    "Something went wrong with key publishing"
                );
                self.sink.published(&account.address, network, false);
                PublishOutcome::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RecordingSink;
    use shared_types::entities::KeyVersion;
    use shared_types::sandbox::{FaucetFailure, InMemoryKeyRegistry, SandboxLedger, SandboxWallet};

    struct Fixture {
        ledger: Arc<SandboxLedger>,
        wallet: Arc<SandboxWallet>,
        registry: Arc<InMemoryKeyRegistry>,
        sink: Arc<RecordingSink>,
        publisher: FaucetPublisher,
    }

    fn fixture() -> Fixture {
        let ledger = SandboxLedger::new();
        let wallet = SandboxWallet::new([5u8; 32], "GNOSIS", Arc::clone(&ledger));
        let registry = InMemoryKeyRegistry::new();
        let sink = Arc::new(RecordingSink::default());
        let publisher = FaucetPublisher::new(
            wallet.clone(),
            registry.clone(),
            &ledger.controllers(),
            sink.clone(),
            FaucetConfig::for_testing(),
        );
        Fixture {
            ledger,
            wallet,
            registry,
            sink,
            publisher,
        }
    }

    fn key() -> PublicKey {
        PublicKey::new(vec![0xab; 32], KeyVersion::V3)
    }

    #[tokio::test]
    async fn test_publish_confirms_and_caches() {
        let f = fixture();
        let account = WalletAccount::evm("0xaa");

        let outcome = f.publisher.publish(&account, &key(), EvmNetwork::Gnosis).await;

        assert!(outcome.success);
        assert!(outcome.tx_hash.is_some());
        let cached = f.registry.remote_keys();
        assert_eq!(cached.len(), 1);
        assert!(cached[0].public_key.same_bytes(&key()));
        assert_eq!(cached[0].registrar, 4);
        assert_eq!(
            f.sink.results(),
            vec![(account.address.clone(), EvmNetwork::Gnosis, true)]
        );
    }

    #[tokio::test]
    async fn test_network_without_faucet_fails() {
        let f = fixture();
        let account = WalletAccount::evm("0xaa");

        let outcome = f.publisher.publish(&account, &key(), EvmNetwork::Ethereum).await;
        assert_eq!(outcome, PublishOutcome::failed());
        assert!(f.registry.remote_keys().is_empty());
    }

    #[tokio::test]
    async fn test_relay_refusal_fails() {
        let f = fixture();
        f.wallet.set_faucet_failure(Some(FaucetFailure::Authorize));

        let outcome = f
            .publisher
            .publish(&WalletAccount::evm("0xaa"), &key(), EvmNetwork::Gnosis)
            .await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_attach_failure_fails() {
        let f = fixture();
        f.wallet.set_faucet_failure(Some(FaucetFailure::Attach));

        let outcome = f
            .publisher
            .publish(&WalletAccount::evm("0xaa"), &key(), EvmNetwork::Polygon)
            .await;
        assert!(!outcome.success);
        assert!(f
            .ledger
            .keys_for(EvmNetwork::Polygon, &Address::new("0xaa"))
            .is_empty());
    }

    #[tokio::test]
    async fn test_unconfirmed_key_times_out() {
        let f = fixture();
        f.wallet.set_faucet_failure(Some(FaucetFailure::NeverConfirm));

        let outcome = f
            .publisher
            .publish(&WalletAccount::evm("0xaa"), &key(), EvmNetwork::Fantom)
            .await;
        assert!(!outcome.success);
        assert_eq!(
            f.sink.results(),
            vec![(Address::new("0xaa"), EvmNetwork::Fantom, false)]
        );
    }

    #[tokio::test]
    async fn test_older_key_with_other_bytes_not_accepted() {
        let f = fixture();
        let account = WalletAccount::evm("0xaa");
        f.ledger.publish_key(
            EvmNetwork::Gnosis,
            &account.address,
            PublicKey::new(vec![0x01], KeyVersion::V2),
            4,
        );
        f.wallet.set_faucet_failure(Some(FaucetFailure::NeverConfirm));

        let outcome = f.publisher.publish(&account, &key(), EvmNetwork::Gnosis).await;
        assert!(!outcome.success);
    }
}
