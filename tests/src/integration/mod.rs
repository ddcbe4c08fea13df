//! # Integration Scenarios
//!
//! Every test builds a fresh sandbox session through
//! [`harness::SandboxSession`]; nothing is shared between tests.

pub mod harness;

mod authorization;
mod messaging;
mod network;
