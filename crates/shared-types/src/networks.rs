//! # Supported Networks
//!
//! The EVM networks a wallet session can be bound to, with the metadata
//! needed to ask a wallet provider to add or switch to them.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Name reported when the wallet's current chain could not be determined.
pub const UNKNOWN_BLOCKCHAIN: &str = "unknown";

/// Supported EVM networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EvmNetwork {
    Ethereum,
    Avalanche,
    Arbitrum,
    BnbChain,
    Optimism,
    Polygon,
    Fantom,
    Klaytn,
    Gnosis,
    Aurora,
    Celo,
    Cronos,
    Moonbeam,
    Moonriver,
    Metis,
}

/// Static metadata for one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkMeta {
    /// Canonical upper-case name used by the messaging core.
    pub name: &'static str,
    /// Human readable title.
    pub title: &'static str,
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Native currency symbol.
    pub currency_symbol: &'static str,
    /// Native currency name.
    pub currency_name: &'static str,
    /// Public RPC endpoint offered to the wallet when adding the chain.
    pub rpc_url: &'static str,
    /// Block explorer offered to the wallet when adding the chain.
    pub explorer_url: &'static str,
}

impl EvmNetwork {
    /// Every supported network, in registration order.
    pub const ALL: [EvmNetwork; 15] = [
        Self::Ethereum,
        Self::Avalanche,
        Self::Arbitrum,
        Self::BnbChain,
        Self::Optimism,
        Self::Polygon,
        Self::Fantom,
        Self::Klaytn,
        Self::Gnosis,
        Self::Aurora,
        Self::Celo,
        Self::Cronos,
        Self::Moonbeam,
        Self::Moonriver,
        Self::Metis,
    ];

    /// Networks served by the key publication faucet.
    pub const FAUCET: [EvmNetwork; 3] = [Self::Gnosis, Self::Fantom, Self::Polygon];

    /// Static metadata.
    #[must_use]
    pub fn meta(&self) -> NetworkMeta {
        let (name, title, chain_id, currency_symbol, currency_name, rpc_url, explorer_url) =
            match self {
                Self::Ethereum => ("ETHEREUM", "Ethereum", 1, "ETH", "Ether", "https://cloudflare-eth.com", "https://etherscan.io"),
                Self::Avalanche => ("AVALANCHE", "Avalanche C-Chain", 43114, "AVAX", "Avalanche", "https://api.avax.network/ext/bc/C/rpc", "https://snowtrace.io"),
                Self::Arbitrum => ("ARBITRUM", "Arbitrum One", 42161, "ETH", "Ether", "https://arb1.arbitrum.io/rpc", "https://arbiscan.io"),
                Self::BnbChain => ("BNBCHAIN", "BNB Chain", 56, "BNB", "BNB", "https://bsc-dataseed.binance.org", "https://bscscan.com"),
                Self::Optimism => ("OPTIMISM", "Optimism", 10, "ETH", "Ether", "https://mainnet.optimism.io", "https://optimistic.etherscan.io"),
                Self::Polygon => ("POLYGON", "Polygon", 137, "MATIC", "MATIC", "https://polygon-rpc.com", "https://polygonscan.com"),
                Self::Fantom => ("FANTOM", "Fantom Opera", 250, "FTM", "Fantom", "https://rpc.ftm.tools", "https://ftmscan.com"),
                Self::Klaytn => ("KLAYTN", "Klaytn", 8217, "KLAY", "Klaytn", "https://public-node-api.klaytnapi.com/v1/cypress", "https://scope.klaytn.com"),
                Self::Gnosis => ("GNOSIS", "Gnosis", 100, "xDAI", "xDAI", "https://rpc.gnosischain.com", "https://gnosisscan.io"),
                Self::Aurora => ("AURORA", "Aurora", 1313161554, "ETH", "Ether", "https://mainnet.aurora.dev", "https://aurorascan.dev"),
                Self::Celo => ("CELO", "Celo", 42220, "CELO", "Celo", "https://forno.celo.org", "https://celoscan.io"),
                Self::Cronos => ("CRONOS", "Cronos", 25, "CRO", "Cronos", "https://evm.cronos.org", "https://cronoscan.com"),
                Self::Moonbeam => ("MOONBEAM", "Moonbeam", 1284, "GLMR", "Glimmer", "https://rpc.api.moonbeam.network", "https://moonscan.io"),
                Self::Moonriver => ("MOONRIVER", "Moonriver", 1285, "MOVR", "Moonriver", "https://rpc.api.moonriver.moonbeam.network", "https://moonriver.moonscan.io"),
                Self::Metis => ("METIS", "Metis Andromeda", 1088, "METIS", "Metis", "https://andromeda.metis.io/?owner=1088", "https://andromeda-explorer.metis.io"),
            };
        NetworkMeta {
            name,
            title,
            chain_id,
            currency_symbol,
            currency_name,
            rpc_url,
            explorer_url,
        }
    }

    /// Canonical name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.meta().name
    }

    /// EIP-155 chain id.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.meta().chain_id
    }

    /// Chain id in the `0x`-prefixed hex form wallet providers expect.
    #[must_use]
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id())
    }

    /// Whether the key publication faucet serves this network.
    #[must_use]
    pub fn has_faucet(&self) -> bool {
        Self::FAUCET.contains(self)
    }

    /// Resolve a network from a name or chain id as reported by a wallet.
    ///
    /// Accepts canonical names case-insensitively, decimal chain ids and
    /// `0x` hex chain ids. Returns `None` for anything else, including the
    /// `"unknown"` sentinel.
    #[must_use]
    pub fn from_name(name_or_id: &str) -> Option<Self> {
        let needle = name_or_id.trim();
        if let Some(found) = Self::ALL
            .iter()
            .find(|n| n.name().eq_ignore_ascii_case(needle))
        {
            return Some(*found);
        }

        let chain_id = match needle.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16).ok()?,
            None => needle.parse::<u64>().ok()?,
        };
        Self::from_chain_id(chain_id)
    }

    /// Resolve a network from its chain id.
    #[must_use]
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|n| n.chain_id() == chain_id)
    }

    /// Parameters for `wallet_addEthereumChain`.
    #[must_use]
    pub fn add_chain_params(&self) -> serde_json::Value {
        let meta = self.meta();
        json!([{
            "chainId": self.chain_id_hex(),
            "chainName": meta.title,
            "nativeCurrency": {
                "name": meta.currency_name,
                "symbol": meta.currency_symbol,
                "decimals": 18,
            },
            "rpcUrls": [meta.rpc_url],
            "blockExplorerUrls": [meta.explorer_url],
        }])
    }

    /// Parameters for `wallet_switchEthereumChain`.
    #[must_use]
    pub fn switch_chain_params(&self) -> serde_json::Value {
        json!([{ "chainId": self.chain_id_hex() }])
    }
}

impl fmt::Display for EvmNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
