//! # Ports Module
//!
//! Hexagonal architecture ports (inbound API, outbound session context).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
