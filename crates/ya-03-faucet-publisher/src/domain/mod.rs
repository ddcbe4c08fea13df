//! # Domain Module
//!
//! Core domain types for the Faucet Publisher.

pub mod errors;
pub mod outcome;

pub use errors::*;
pub use outcome::*;
