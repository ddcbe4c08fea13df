//! # YA-01 Wallet Session
//!
//! Owns one wallet provider's controller for the lifetime of a session.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Query the wallet's current network (failures fall back to `"unknown"`)
//!   and authenticated account (failures abort) when attaching.
//! - Subscribe to the four wallet event kinds and fold them into two
//!   signals: `account_update(Option<WalletAccount>)` and
//!   `network_update(String)`.
//! - Detach every listener on teardown, any number of times.
//! - Derive local keys through the key registry with wallet-signature
//!   callbacks, and read the account's published keys across networks.
//!
//! ## Module Structure
//!
//! ```text
//! ya-01-wallet-session/
//! ├── domain/      # SessionError, remote key resolution
//! ├── ports/       # WalletSessionApi (inbound), SessionSignals (outbound)
//! ├── adapters/    # BusSignals (shared-bus publisher)
//! └── service.rs   # WalletSession
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::BusSignals;
pub use domain::{latest_key, RemoteKeySnapshot, SessionError};
pub use ports::{RecordedSignal, RecordingSignals, SessionSignals, SessionSnapshot, WalletSessionApi};
pub use service::WalletSession;
