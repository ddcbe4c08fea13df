//! # Domain Module
//!
//! Core domain types for the Wallet Session.

pub mod errors;
pub mod remote_keys;

pub use errors::*;
pub use remote_keys::*;
