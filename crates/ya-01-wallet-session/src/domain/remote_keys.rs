//! # Remote Key Resolution
//!
//! Picks the account's published key out of per-network lookups.
//! An address may have published on several networks; the key with the
//! greatest timestamp wins, and within one network the last entry wins
//! on equal timestamps.

use serde::Serialize;
use shared_types::entities::RemotePublicKey;
use shared_types::networks::EvmNetwork;
use std::collections::BTreeMap;

/// Result of reading remote keys across every network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoteKeySnapshot {
    /// Freshest key across all networks.
    pub freshest: Option<RemotePublicKey>,
    /// Latest key per network that answered. Networks that failed are absent.
    pub by_network: BTreeMap<EvmNetwork, Option<RemotePublicKey>>,
}

impl RemoteKeySnapshot {
    /// Build a snapshot from the per-network latest keys.
    #[must_use]
    pub fn from_networks(by_network: BTreeMap<EvmNetwork, Option<RemotePublicKey>>) -> Self {
        let freshest = by_network
            .values()
            .flatten()
            .fold(None::<&RemotePublicKey>, |best, key| match best {
                Some(b) if b.timestamp >= key.timestamp => Some(b),
                _ => Some(key),
            })
            .cloned();
        Self {
            freshest,
            by_network,
        }
    }

    /// Networks that answered the lookup.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.by_network.len()
    }
}

/// Latest key in one network's publication list.
#[must_use]
pub fn latest_key(keys: &[RemotePublicKey]) -> Option<&RemotePublicKey> {
    keys.iter()
        .fold(None::<&RemotePublicKey>, |best, key| match best {
            Some(b) if b.timestamp > key.timestamp => Some(b),
            _ => Some(key),
        })
}
