//! # Ylide-Auth Test Suite
//!
//! Scenarios that run the whole session runtime against the sandbox
//! collaborators.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs           # Sandbox session fixture, UI simulator
//!     ├── authorization.rs     # Auto key, password flow, stale events
//!     ├── messaging.rs         # Send, broadcast, decode, balances
//!     └── network.rs           # Network tracking and switching
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ya-tests
//! cargo test -p ya-tests integration::authorization::
//! ```

#![allow(dead_code)]

pub mod integration;
