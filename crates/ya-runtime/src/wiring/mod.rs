//! # Session Wiring
//!
//! Components publish notifications on the session bus; the router here
//! is the only consumer that turns them into calls on other components.
//!
//! ```text
//! WalletSession ──AccountUpdate──▶ router ──▶ auth.handle_event + recompute
//! WalletSession ──NetworkUpdate──▶ router ──▶ coordinator.handle_network_update
//! identity      ──IdentityBound──▶ router ──▶ auth.handle_event + recompute
//! everything    ─────────────────▶ router ──▶ metrics
//! ```

pub mod event_routing;

pub use event_routing::SessionRouter;
