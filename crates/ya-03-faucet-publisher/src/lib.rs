//! # YA-03 Faucet Publisher
//!
//! Publishes a newly derived public key on-chain through a third-party
//! relay that pays the transaction fee, then waits until the key is
//! resolvable for the account's address.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! Only GNOSIS, FANTOM and POLYGON have a relay. The publisher never
//! returns an error: every failure is logged and reported as
//! `PublishOutcome { success: false, .. }`.
//!
//! ## Module Structure
//!
//! ```text
//! ya-03-faucet-publisher/
//! ├── domain/      # PublishOutcome, PublishError (internal)
//! ├── ports/       # KeyPublisher (inbound), PublicationSink (outbound)
//! ├── adapters/    # BusPublicationSink
//! ├── config.rs    # FaucetConfig
//! └── service.rs   # FaucetPublisher
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::BusPublicationSink;
pub use config::FaucetConfig;
pub use domain::{PublishError, PublishOutcome};
pub use ports::{KeyPublisher, NoOpSink, PublicationSink, RecordingSink};
pub use service::FaucetPublisher;
