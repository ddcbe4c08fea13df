//! Adapters layer for the Faucet Publisher.

pub mod bus;

pub use bus::BusPublicationSink;
