//! # Event Routing
//!
//! Consumes the session bus and applies wallet-side events to the
//! authorization state machine and the network coordinator.
//!
//! Events are applied one at a time in bus order, so an account update
//! is always folded in before the next one. The recompute that follows
//! runs on its own task; the state machine keeps it single-flight and
//! discards results that belong to a superseded account.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use shared_bus::{EventTopic, InputKind, NoticeLevel, SessionEvent, Subscription};
use shared_types::entities::AuthorizationState;
use ya_02_network_coordinator::{NetworkCoordinator, NetworkCoordinatorApi};
use ya_04_authorization::{AuthorizationApi, AuthorizationStateMachine};
use ya_telemetry::{
    metric_inc, set_auth_state, AUTH_TRANSITIONS, BUS_EVENTS, KEY_PUBLICATIONS, MESSAGES_SENT,
    NOTICES, PROMPTS_OPENED,
};

/// Routes session bus events to the components that react to them.
#[derive(Clone)]
pub struct SessionRouter {
    auth: Arc<AuthorizationStateMachine>,
    coordinator: Arc<NetworkCoordinator>,
}

impl SessionRouter {
    /// Create a router.
    pub fn new(auth: Arc<AuthorizationStateMachine>, coordinator: Arc<NetworkCoordinator>) -> Self {
        Self { auth, coordinator }
    }

    /// Apply one event.
    ///
    /// Returns the spawned recompute when the event can change the
    /// authorization state.
    pub async fn route(&self, event: &SessionEvent) -> Option<JoinHandle<AuthorizationState>> {
        record_metrics(event);

        match event {
            SessionEvent::AccountUpdate(_) | SessionEvent::IdentityBound(_) => {
                let state = self.auth.handle_event(event).await;
                debug!(source = event.source(), state = %state, "Wallet event applied");
                let auth = Arc::clone(&self.auth);
                Some(tokio::spawn(async move { auth.recompute().await }))
            }
            SessionEvent::NetworkUpdate(name) => {
                self.coordinator.handle_network_update(name);
                None
            }
            _ => None,
        }
    }

    /// Route events until shutdown is signalled or the bus closes.
    ///
    /// Recomputes still running when the loop ends are aborted before
    /// this returns, so awaiting the router task also waits them out.
    pub async fn run(self, mut subscription: Subscription, mut shutdown: watch::Receiver<bool>) {
        info!("Session event router started");
        let mut in_flight: Vec<JoinHandle<AuthorizationState>> = Vec::new();
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                event = subscription.recv() => {
                    match event {
                        Some(event) => {
                            in_flight.retain(|task| !task.is_finished());
                            if let Some(task) = self.route(&event).await {
                                in_flight.push(task);
                            }
                        }
                        None => {
                            warn!("Session bus closed");
                            break;
                        }
                    }
                }
            }
        }

        for task in &in_flight {
            task.abort();
        }
        let mut aborted = 0usize;
        for task in in_flight {
            if matches!(task.await, Err(e) if e.is_cancelled()) {
                aborted += 1;
            }
        }
        info!(aborted, "Session event router stopped");
    }
}

fn topic_label(topic: EventTopic) -> &'static str {
    match topic {
        EventTopic::All => "all",
        EventTopic::Wallet => "wallet",
        EventTopic::Authorization => "authorization",
        EventTopic::Activity => "activity",
        EventTopic::Notices => "notices",
        EventTopic::Interaction => "interaction",
    }
}

fn record_metrics(event: &SessionEvent) {
    metric_inc!(BUS_EVENTS, &[topic_label(event.topic())]);

    match event {
        SessionEvent::AuthorizationChanged { to, .. } => {
            metric_inc!(AUTH_TRANSITIONS, &[to.as_str()]);
            let labels = AuthorizationState::ALL.map(|s| s.as_str());
            set_auth_state(to.as_str(), &labels);
        }
        SessionEvent::KeyPublished {
            network, success, ..
        } => {
            let outcome = if *success { "success" } else { "failure" };
            metric_inc!(KEY_PUBLICATIONS, &[network.as_str(), outcome]);
        }
        SessionEvent::MessageSent {
            network, broadcast, ..
        } => {
            let kind = if *broadcast { "broadcast" } else { "mail" };
            metric_inc!(MESSAGES_SENT, &[network.as_str(), kind]);
        }
        SessionEvent::Notice(notice) => {
            let level = match notice.level {
                NoticeLevel::Info => "info",
                NoticeLevel::Success => "success",
                NoticeLevel::Error => "error",
            };
            metric_inc!(NOTICES, &[level]);
        }
        SessionEvent::InteractionRequested { kind, .. } => {
            let kind = match kind {
                InputKind::Password { .. } => "password",
                InputKind::NetworkChoice => "network",
            };
            metric_inc!(PROMPTS_OPENED, &[kind]);
        }
        _ => {}
    }
}
