//! # Provider Methods
//!
//! EIP-1193 method names and the user-facing text for switch failures.

use shared_types::networks::EvmNetwork;

/// Ask the wallet to register a chain.
pub const ADD_CHAIN_METHOD: &str = "wallet_addEthereumChain";

/// Ask the wallet to change chains.
pub const SWITCH_CHAIN_METHOD: &str = "wallet_switchEthereumChain";

/// Notice shown when a wallet-requested switch could not be performed.
#[must_use]
pub fn wrong_network_message(current: Option<EvmNetwork>, needed: EvmNetwork) -> String {
    let current = current.map_or("unknown", |n| n.name());
    format!("Wrong network ({current}), switch to {needed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_network_message() {
        assert_eq!(
            wrong_network_message(Some(EvmNetwork::Ethereum), EvmNetwork::Gnosis),
            "Wrong network (ETHEREUM), switch to GNOSIS"
        );
        assert_eq!(
            wrong_network_message(None, EvmNetwork::Fantom),
            "Wrong network (unknown), switch to FANTOM"
        );
    }
}
