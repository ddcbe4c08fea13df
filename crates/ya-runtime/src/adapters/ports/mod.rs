//! # Port Adapters
//!
//! One module per consuming component.

pub mod authorization;
pub mod messaging;

pub use authorization::{FaucetKeyPublication, SessionKeySource};
pub use messaging::SessionMessagingContext;
