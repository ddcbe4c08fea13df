//! # YA-05 Messaging
//!
//! Direct mail, personal broadcasts, content decoding and balance lookups
//! on top of the message core.
//!
//! **Subsystem ID:** 5
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! Writes need an account and an `AUTHORIZED` session. Mail goes to the
//! active network; a broadcast without an explicit network asks the user
//! to pick one.
//!
//! ## Module Structure
//!
//! ```text
//! ya-05-messaging/
//! ├── domain/      # MessagingError, notice text
//! ├── ports/       # MessagingApi (inbound), MessagingContext, ActivitySink (outbound)
//! ├── adapters/    # BusActivity
//! └── service.rs   # MessagingService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::BusActivity;
pub use domain::{MessagingError, CONTENT_UNAVAILABLE_NOTICE};
pub use ports::{ActivitySink, FixedContext, MessagingApi, MessagingContext, RecordingActivity};
pub use service::MessagingService;
