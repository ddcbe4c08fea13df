//! Adapters layer for the Network Coordinator.

pub mod prompts;

pub use prompts::BusPrompts;
