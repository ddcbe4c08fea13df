//! Adapters layer for the Authorization State Machine.

pub mod bus;

pub use bus::BusAuthInteraction;
