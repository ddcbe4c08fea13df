//! # YA-02 Network Coordinator
//!
//! Tracks which network the wallet is on and moves it when an operation
//! needs a different one.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Switching
//!
//! ```text
//! request_network_switch(target)
//!     │
//!     ├── active == target ──→ done
//!     │
//!     ├── wallet_addEthereumChain     (best-effort, errors ignored)
//!     ├── wallet_switchEthereumChain  (errors propagate)
//!     └── active := target            (optimistic)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! ya-02-network-coordinator/
//! ├── domain/      # NetworkError, provider method names, notice text
//! ├── ports/       # NetworkCoordinatorApi (inbound), NetworkPrompts (outbound)
//! ├── adapters/    # BusPrompts (interaction broker + notices)
//! └── service.rs   # NetworkCoordinator
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::BusPrompts;
pub use domain::{wrong_network_message, NetworkError, ADD_CHAIN_METHOD, SWITCH_CHAIN_METHOD};
pub use ports::{NetworkCoordinatorApi, NetworkPrompts, ScriptedPrompts};
pub use service::NetworkCoordinator;
