//! Adapters layer for the Messaging service.

pub mod bus;

pub use bus::BusActivity;
