//! # Session Container
//!
//! Configuration and the component instances of one wallet session.

pub mod config;
pub mod session;

pub use config::{ConfigError, ServiceConfig};
pub use session::{Collaborators, SessionContainer};
