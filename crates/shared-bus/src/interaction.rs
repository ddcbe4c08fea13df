//! # Interaction Broker
//!
//! Async request/response channel for user prompts.
//!
//! A component that needs input calls [`InteractionBroker::request`] and
//! suspends. The broker announces the prompt on the bus as
//! `InteractionRequested`; the UI layer (the only consumer of the kind)
//! answers with [`InteractionBroker::resolve`] or [`InteractionBroker::cancel`].
//!
//! Flow:
//! 1. Caller invokes `request(kind)`
//! 2. Broker registers a oneshot sender under a fresh `InteractionId`
//! 3. Broker emits `InteractionRequested { id, kind }`
//! 4. UI calls `resolve(id, value)` or `cancel(id)`
//! 5. Caller wakes with `Some(value)` or `None`

use crate::events::SessionEvent;
use crate::publisher::InMemoryEventBus;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use shared_types::entities::Address;
use shared_types::networks::EvmNetwork;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifier of one open prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionId(Uuid);

impl InteractionId {
    /// Generate a new identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a prompt asks the user for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    /// Messaging password for an address.
    Password {
        /// Address the password unlocks.
        address: Address,
        /// Set when a previous attempt was wrong.
        retry: bool,
    },
    /// A network to operate on.
    NetworkChoice,
}

impl InputKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::NetworkChoice => "network-choice",
        }
    }
}

/// A value supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputValue {
    /// Entered password.
    Password(String),
    /// Chosen network.
    Network(EvmNetwork),
}

/// Prompt settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Close unanswered prompts after this many seconds. `None` waits forever.
    pub prompt_timeout_secs: Option<u64>,
}

impl InteractionConfig {
    /// Short timeout so abandoned prompts do not hang tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            prompt_timeout_secs: Some(5),
        }
    }

    fn timeout(&self) -> Option<Duration> {
        self.prompt_timeout_secs.map(Duration::from_secs)
    }
}

/// Counters for prompt traffic.
#[derive(Debug, Default)]
pub struct InteractionStats {
    /// Prompts opened.
    pub opened: AtomicU64,
    /// Prompts answered with a value.
    pub resolved: AtomicU64,
    /// Prompts cancelled or abandoned.
    pub cancelled: AtomicU64,
}

struct PendingPrompt {
    sender: oneshot::Sender<Option<InputValue>>,
    kind: InputKind,
    created_at: Instant,
}

/// Closes a prompt when its request finishes or is dropped mid-wait.
struct OpenPrompt<'a> {
    broker: &'a InteractionBroker,
    id: InteractionId,
    resolved: bool,
}

impl Drop for OpenPrompt<'_> {
    fn drop(&mut self) {
        // Already gone when resolved or cancelled; present after a timeout
        // or when the caller stopped waiting.
        if self.broker.pending.remove(&self.id).is_some() {
            self.broker.stats.cancelled.fetch_add(1, Ordering::Relaxed);
        }
        self.broker.bus.emit(SessionEvent::InteractionClosed {
            id: self.id,
            resolved: self.resolved,
        });
    }
}

/// Bridges suspended callers and the UI layer.
pub struct InteractionBroker {
    pending: DashMap<InteractionId, PendingPrompt>,
    bus: Arc<InMemoryEventBus>,
    config: InteractionConfig,
    stats: InteractionStats,
}

impl InteractionBroker {
    /// Create a broker announcing prompts on `bus`.
    pub fn new(bus: Arc<InMemoryEventBus>, config: InteractionConfig) -> Self {
        Self {
            pending: DashMap::new(),
            bus,
            config,
            stats: InteractionStats::default(),
        }
    }

    /// Open a prompt and wait for its outcome.
    ///
    /// Returns `None` when the prompt is cancelled, times out or the broker
    /// drops the request.
    pub async fn request(&self, kind: InputKind) -> Option<InputValue> {
        let id = InteractionId::new();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            id,
            PendingPrompt {
                sender: tx,
                kind: kind.clone(),
                created_at: Instant::now(),
            },
        );
        let mut open = OpenPrompt {
            broker: self,
            id,
            resolved: false,
        };
        self.stats.opened.fetch_add(1, Ordering::Relaxed);
        debug!(interaction = %id, kind = kind.label(), "Prompt opened");
        self.bus.emit(SessionEvent::InteractionRequested { id, kind });

        let outcome = match self.config.timeout() {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received.ok().flatten(),
                Err(_) => {
                    warn!(interaction = %id, "Prompt timed out");
                    None
                }
            },
            None => rx.await.ok().flatten(),
        };

        open.resolved = outcome.is_some();
        outcome
    }

    /// Answer a prompt. Returns `false` if it is not open.
    pub fn resolve(&self, id: InteractionId, value: InputValue) -> bool {
        let Some((_, prompt)) = self.pending.remove(&id) else {
            warn!(interaction = %id, "Resolve for unknown prompt");
            return false;
        };
        debug!(
            interaction = %id,
            kind = prompt.kind.label(),
            waited_ms = prompt.created_at.elapsed().as_millis() as u64,
            "Prompt resolved"
        );
        self.stats.resolved.fetch_add(1, Ordering::Relaxed);
        prompt.sender.send(Some(value)).is_ok()
    }

    /// Close a prompt without a value. Returns `false` if it is not open.
    pub fn cancel(&self, id: InteractionId) -> bool {
        let Some((_, prompt)) = self.pending.remove(&id) else {
            return false;
        };
        debug!(interaction = %id, kind = prompt.kind.label(), "Prompt cancelled");
        self.stats.cancelled.fetch_add(1, Ordering::Relaxed);
        let _ = prompt.sender.send(None);
        true
    }

    /// Open prompts with their kinds.
    #[must_use]
    pub fn pending(&self) -> Vec<(InteractionId, InputKind)> {
        self.pending
            .iter()
            .map(|entry| (*entry.key(), entry.value().kind.clone()))
            .collect()
    }

    /// Number of open prompts.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Prompt counters.
    #[must_use]
    pub fn stats(&self) -> &InteractionStats {
        &self.stats
    }
}
