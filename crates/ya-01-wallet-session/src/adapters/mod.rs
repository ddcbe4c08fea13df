//! Adapters layer for the Wallet Session.
//!
//! Connects session signals to the shared bus.

pub mod bus;

pub use bus::BusSignals;
