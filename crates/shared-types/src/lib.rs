//! # Shared Types Crate
//!
//! This crate contains the session data model, the supported network
//! table, messaging protocol constants and the capability traits for
//! every external collaborator the session talks to.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Opaque Collaborators**: Wallets, chains, the key registry and the
//!   message core are reached only through the traits in `collaborators`.
//! - **Sandbox Included**: `sandbox` provides in-memory collaborators for
//!   tests and the runtime's demo mode.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod collaborators;
pub mod entities;
pub mod errors;
pub mod networks;
pub mod protocol;
pub mod sandbox;

pub use collaborators::*;
pub use entities::*;
pub use errors::*;
pub use networks::{EvmNetwork, NetworkMeta, UNKNOWN_BLOCKCHAIN};
pub use protocol::*;
