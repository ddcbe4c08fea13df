//! # Domain Module

pub mod errors;

pub use errors::*;

/// Notice shown when a message body cannot be fetched or fails integrity checks.
pub const CONTENT_UNAVAILABLE_NOTICE: &str = "Content is not available or corrupted";
