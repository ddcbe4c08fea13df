//! # Ylide Session Runtime
//!
//! Wires the five session components together over the session bus.
//!
//! ## Module Structure
//!
//! - `container/` - Service configuration and the component container
//! - `adapters/` - Port implementations connecting components
//! - `wiring/` - Bus event routing
//! - `runtime` - Startup, identity binding and shutdown
//!
//! ## Session Flow
//!
//! ```text
//! start()
//!   ├── WalletSession.initialize        account + network snapshot
//!   ├── NetworkCoordinator.attach       active network
//!   ├── AuthorizationStateMachine.initialize(account)
//!   ├── spawn SessionRouter             bus → auth / coordinator / metrics
//!   └── spawn recompute                 auto-authorization if possible
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod container;
pub mod runtime;
pub mod wiring;

pub use container::{Collaborators, ConfigError, ServiceConfig, SessionContainer};
pub use container::session::SandboxHandles;
pub use runtime::SessionRuntime;
pub use wiring::SessionRouter;
