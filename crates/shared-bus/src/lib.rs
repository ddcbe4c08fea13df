//! # Shared Bus - Session Event Bus
//!
//! In-process event bus connecting the wallet session, the network
//! coordinator, the authorization state machine and the UI layer.
//!
//! ## Choreography
//!
//! ```text
//! ┌────────────────┐   AccountUpdate    ┌──────────────────┐
//! │ WalletSession  │ ─────────────────▶ │    Event Bus     │
//! └────────────────┘   NetworkUpdate    │                  │
//!                                       │                  │ ──▶ event router
//! ┌────────────────┐ InteractionRequest │                  │ ──▶ UI layer
//! │ Interaction    │ ─────────────────▶ │                  │
//! │ Broker         │ ◀── resolve() ──── └──────────────────┘
//! └────────────────┘
//! ```
//!
//! Components never call each other through the bus; it carries
//! notifications only. Prompts are answered through the broker.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod interaction;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, Notice, NoticeLevel, SessionEvent};
pub use interaction::{
    InputKind, InputValue, InteractionBroker, InteractionConfig, InteractionId, InteractionStats,
};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
