//! # Session Events
//!
//! Defines all event types that flow through the session bus.

use crate::interaction::{InputKind, InteractionId};
use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, AuthorizationState, ExternalIdentity, WalletAccount};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// An operation completed.
    Success,
    /// An operation failed.
    Error,
}

/// A user-visible toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// All events that can be published to the session bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    // =========================================================================
    // WALLET SESSION
    // =========================================================================
    /// The current account changed (login, logout or account switch).
    AccountUpdate(Option<WalletAccount>),

    /// The wallet switched chains. Carries the name or chain id as reported.
    NetworkUpdate(String),

    /// An external (DID) identity was bound or unbound.
    IdentityBound(Option<ExternalIdentity>),

    // =========================================================================
    // AUTHORIZATION
    // =========================================================================
    /// The derived authorization state changed.
    AuthorizationChanged {
        /// Account the state refers to.
        address: Option<Address>,
        /// Previous state.
        from: AuthorizationState,
        /// New state.
        to: AuthorizationState,
    },

    // =========================================================================
    // PUBLICATION + MESSAGING
    // =========================================================================
    /// A faucet publication finished.
    KeyPublished {
        /// Account the key belongs to.
        address: Address,
        /// Network name.
        network: String,
        /// Whether the key landed on-chain.
        success: bool,
    },

    /// A message or broadcast was written.
    MessageSent {
        /// Network name.
        network: String,
        /// Broadcast rather than direct mail.
        broadcast: bool,
        /// Transaction hash.
        tx_hash: String,
    },

    // =========================================================================
    // USER INTERACTION
    // =========================================================================
    /// A notice for the user.
    Notice(Notice),

    /// A prompt was opened and awaits `InteractionBroker::resolve`.
    InteractionRequested {
        /// Prompt identifier.
        id: InteractionId,
        /// What is being asked.
        kind: InputKind,
    },

    /// A prompt closed.
    InteractionClosed {
        /// Prompt identifier.
        id: InteractionId,
        /// Whether a value was supplied.
        resolved: bool,
    },
}

impl SessionEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::AccountUpdate(_) | Self::NetworkUpdate(_) | Self::IdentityBound(_) => {
                EventTopic::Wallet
            }
            Self::AuthorizationChanged { .. } => EventTopic::Authorization,
            Self::KeyPublished { .. } | Self::MessageSent { .. } => EventTopic::Activity,
            Self::Notice(_) => EventTopic::Notices,
            Self::InteractionRequested { .. } | Self::InteractionClosed { .. } => {
                EventTopic::Interaction
            }
        }
    }

    /// Get the component that emits this event.
    #[must_use]
    pub fn source(&self) -> &'static str {
        match self {
            Self::AccountUpdate(_) | Self::NetworkUpdate(_) => "wallet-session",
            Self::IdentityBound(_) => "identity",
            Self::AuthorizationChanged { .. } => "authorization",
            Self::KeyPublished { .. } => "faucet-publisher",
            Self::MessageSent { .. } => "messaging",
            Self::Notice(_) => "notices",
            Self::InteractionRequested { .. } | Self::InteractionClosed { .. } => "interaction",
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// All events.
    All,
    /// Account, network and identity updates.
    Wallet,
    /// Authorization state changes.
    Authorization,
    /// Publication and message writes.
    Activity,
    /// User-visible notices.
    Notices,
    /// Prompts opened and closed.
    Interaction,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &SessionEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
