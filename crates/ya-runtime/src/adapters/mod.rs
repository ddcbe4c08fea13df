//! # Adapter Implementations
//!
//! Concrete implementations of the outbound ports each component declares,
//! backed by the other components of the same session.
//!
//! ```text
//! ya-04 KeySource           ──▶ ya-01 WalletSession
//! ya-04 KeyPublication      ──▶ ya-03 FaucetPublisher
//! ya-05 MessagingContext    ──▶ ya-04 state + ya-02 NetworkCoordinator
//! ```
//!
//! Components never depend on each other directly; only this crate
//! knows about all of them.

pub mod ports;

pub use ports::{FaucetKeyPublication, SessionKeySource, SessionMessagingContext};
