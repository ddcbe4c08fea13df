//! # YA-04 Authorization State Machine
//!
//! Decides whether the current account holds a usable messaging key and
//! drives it there.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## States
//!
//! ```text
//!   LOADING ──→ NOT_AUTHORIZED ──(account + identity)──→ NO_REMOTE_KEY
//!                                                           │ derive V3, publish
//!                                                           ▼
//!   LOCAL_REMOTE_MISMATCH ←── HAS_REMOTE_BUT_NO_LOCAL_KEY ──→ AUTHORIZED
//!                                 │ V3: derive automatically
//!                                 │ V1/V2: password prompt (force_authorize)
//! ```
//!
//! The state is never stored. It is recomputed from the session view on
//! every read.
//!
//! ## Module Structure
//!
//! ```text
//! ya-04-authorization/
//! ├── domain/      # decision list, key policy, AuthError
//! ├── ports/       # AuthorizationApi (inbound), KeySource, KeyPublication,
//! │                # AuthInteraction (outbound)
//! ├── adapters/    # BusAuthInteraction
//! ├── config.rs    # AuthConfig
//! └── service.rs   # AuthorizationStateMachine
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::BusAuthInteraction;
pub use config::AuthConfig;
pub use domain::{
    compute_authorization_state, is_password_needed, select_key_version, AuthError, AuthSnapshot,
};
pub use ports::{
    AuthInteraction, AuthorizationApi, KeyPublication, KeySource, MockKeySource,
    MockPublication, ScriptedInteraction,
};
pub use service::{AuthorizationStateMachine, AUTHORIZED_NOTICE, WRONG_PASSWORD_NOTICE};
