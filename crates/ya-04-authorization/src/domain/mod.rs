//! # Domain Module
//!
//! Pure authorization logic: the decision list and the key policy.

pub mod errors;
pub mod key_policy;
pub mod state;

pub use errors::*;
pub use key_policy::*;
pub use state::*;
