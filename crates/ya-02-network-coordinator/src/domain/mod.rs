//! # Domain Module
//!
//! Core domain types for the Network Coordinator.

pub mod errors;
pub mod methods;

pub use errors::*;
pub use methods::*;
