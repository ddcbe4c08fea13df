//! # Session Runtime
//!
//! Owns a [`SessionContainer`] and the background tasks that keep it
//! reacting to wallet events.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use shared_bus::{EventFilter, EventTopic, SessionEvent};
use shared_types::entities::{AuthorizationState, ExternalIdentity};
use ya_01_wallet_session::{SessionSnapshot, WalletSessionApi};
use ya_04_authorization::AuthorizationApi;

use crate::container::SessionContainer;
use crate::wiring::SessionRouter;

/// A running wallet session.
pub struct SessionRuntime {
    container: Arc<SessionContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SessionRuntime {
    /// Create a runtime around a built container. Nothing runs until [`start`](Self::start).
    pub fn new(container: SessionContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Component container.
    pub fn container(&self) -> Arc<SessionContainer> {
        Arc::clone(&self.container)
    }

    /// Start the session.
    ///
    /// ## Startup Sequence
    ///
    /// 1. Subscribe the router so no wallet event is missed
    /// 2. Initialize the wallet session
    /// 3. Attach the network coordinator
    /// 4. Initialize authorization with the current account
    /// 5. Spawn the router and the first recompute
    pub async fn start(&self) -> Result<SessionSnapshot> {
        let c = &self.container;
        let subscription = c.bus.subscribe(EventFilter::all());

        let snapshot = c
            .session
            .initialize()
            .await
            .context("wallet session initialization failed")?;
        let network = c.coordinator.attach().await;
        let state = c.auth.initialize(snapshot.account.clone()).await;

        info!(
            available = snapshot.available,
            network = ?network,
            state = %state,
            "Session started"
        );

        let router = SessionRouter::new(Arc::clone(&c.auth), Arc::clone(&c.coordinator));
        let router_task = tokio::spawn(router.run(subscription, self.shutdown_rx.clone()));

        let auth = Arc::clone(&c.auth);
        let mut shutdown = self.shutdown_rx.clone();
        let recompute_task = tokio::spawn(async move {
            tokio::select! {
                state = auth.recompute() => {
                    info!(state = %state, "Initial authorization settled");
                }
                _ = shutdown.changed() => {}
            }
        });

        self.tasks.lock().extend([router_task, recompute_task]);
        Ok(snapshot)
    }

    /// Bind or unbind the external identity. Applied through the bus like
    /// any wallet event.
    pub fn bind_identity(&self, identity: Option<ExternalIdentity>) {
        self.container.bus.emit(SessionEvent::IdentityBound(identity));
    }

    /// Wait until the authorization state is `target`.
    ///
    /// Returns `false` if `limit` elapses first.
    pub async fn wait_for_state(&self, target: AuthorizationState, limit: Duration) -> bool {
        let mut changes = self
            .container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Authorization]));
        if self.container.auth.get_authorization_state() == target {
            return true;
        }

        let wait = async {
            while let Some(event) = changes.recv().await {
                if let SessionEvent::AuthorizationChanged { to, .. } = event {
                    if to == target {
                        return true;
                    }
                }
            }
            false
        };
        tokio::time::timeout(limit, wait).await.unwrap_or(false)
    }

    /// Stop background tasks and detach from the wallet.
    pub async fn shutdown(&self) {
        info!("Session shutting down");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                error!(error = %e, "Session task ended abnormally");
            }
        }
        self.container.session.teardown();
        info!("Session shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ServiceConfig;
    use shared_types::entities::WalletAccount;

    #[tokio::test]
    async fn test_start_authorizes_logged_in_account() {
        let (container, handles) = SessionContainer::sandbox(ServiceConfig::for_testing(), [4; 32]);
        handles.wallet.set_account(Some(WalletAccount::evm("0xa1")));
        let runtime = SessionRuntime::new(container);

        let snapshot = runtime.start().await.unwrap();
        assert_eq!(snapshot.account, Some(WalletAccount::evm("0xa1")));

        assert!(
            runtime
                .wait_for_state(AuthorizationState::Authorized, Duration::from_secs(5))
                .await
        );
        runtime.shutdown().await;
        assert_eq!(handles.wallet.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_start_fails_when_account_query_fails() {
        let (container, handles) = SessionContainer::sandbox(ServiceConfig::for_testing(), [4; 32]);
        handles.wallet.set_fail_account_query(true);
        let runtime = SessionRuntime::new(container);

        let err = runtime.start().await.unwrap_err();
        assert!(err.to_string().contains("wallet session initialization failed"));
    }

    #[tokio::test]
    async fn test_identity_gate() {
        let mut config = ServiceConfig::for_testing();
        config.auth.require_identity = true;
        let (container, handles) = SessionContainer::sandbox(config, [4; 32]);
        handles.wallet.set_account(Some(WalletAccount::evm("0xa2")));
        let runtime = SessionRuntime::new(container);
        runtime.start().await.unwrap();

        assert!(
            runtime
                .wait_for_state(AuthorizationState::NotAuthorized, Duration::from_secs(5))
                .await
        );

        runtime.bind_identity(Some(ExternalIdentity {
            account: "0xa2".into(),
            identifier: "did:ylide:0xa2".into(),
        }));
        assert!(
            runtime
                .wait_for_state(AuthorizationState::Authorized, Duration::from_secs(5))
                .await
        );
        runtime.shutdown().await;
    }
}
