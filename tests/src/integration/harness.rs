//! # Sandbox Session Harness
//!
//! Builds a complete session runtime over the in-memory sandbox and
//! simulates the UI layer answering prompts.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use shared_bus::{
    EventFilter, EventTopic, InputKind, InputValue, SessionEvent, Subscription,
};
use shared_types::entities::{AuthorizationState, KeyVersion, PublicKey, WalletAccount};
use shared_types::networks::EvmNetwork;
use ya_01_wallet_session::WalletSessionApi;
use ya_runtime::{SandboxHandles, ServiceConfig, SessionContainer, SessionRuntime};

/// How long scenarios wait for asynchronous effects.
pub const SETTLE: Duration = Duration::from_secs(5);

/// Wallet seed used by every scenario.
pub const SEED: [u8; 32] = [0x42; 32];

/// An answer the simulated user gives to a prompt. `None` closes it.
pub type Answer = Option<InputValue>;

/// A sandbox-backed session runtime.
pub struct SandboxSession {
    /// The runtime under test.
    pub runtime: SessionRuntime,
    /// Its components.
    pub container: Arc<SessionContainer>,
    /// The sandbox collaborators behind it.
    pub sandbox: SandboxHandles,
}

impl SandboxSession {
    /// Build with test configuration. Nothing runs until [`start`](Self::start).
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::for_testing())
    }

    /// Build with an explicit configuration.
    pub fn with_config(config: ServiceConfig) -> Self {
        let (container, sandbox) = SessionContainer::sandbox(config, SEED);
        let runtime = SessionRuntime::new(container);
        let container = runtime.container();
        Self {
            runtime,
            container,
            sandbox,
        }
    }

    /// Start the runtime.
    pub async fn start(&self) {
        self.runtime
            .start()
            .await
            .expect("sandbox session should start");
    }

    /// Log `account` in through the wallet and wait for the state to settle
    /// on `expected`.
    pub async fn login(&self, account: &WalletAccount, expected: AuthorizationState) {
        self.sandbox.wallet.login(account.clone());
        assert!(
            self.wait_for(expected).await,
            "expected {expected} after login, got {}",
            self.state()
        );
    }

    /// Current authorization state.
    pub fn state(&self) -> AuthorizationState {
        use ya_04_authorization::AuthorizationApi;
        self.container.auth.get_authorization_state()
    }

    /// Wait for `target`.
    pub async fn wait_for(&self, target: AuthorizationState) -> bool {
        self.runtime.wait_for_state(target, SETTLE).await
    }

    /// Derive the key the wallet would produce, without storing it.
    pub async fn derive_key(
        &self,
        account: &WalletAccount,
        version: KeyVersion,
        password: Option<&str>,
    ) -> PublicKey {
        self.container
            .session
            .construct_local_key(account, version, password.map(str::to_string))
            .await
            .expect("sandbox derivation should succeed")
            .public_key
    }

    /// Publish a key for `account` directly on the sandbox ledger.
    pub fn publish_remote(&self, network: EvmNetwork, account: &WalletAccount, key: PublicKey) {
        self.sandbox
            .ledger
            .publish_key(network, &account.address, key, 4);
    }

    /// Subscribe to notices.
    pub fn notices(&self) -> Subscription {
        self.container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Notices]))
    }

    /// Simulate the user answering prompts with `answers`, in order.
    ///
    /// Prompts beyond the scripted answers are closed.
    pub fn script_ui(&self, answers: Vec<Answer>) -> ScriptedUi {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let mut events = self
            .container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Interaction]));
        let broker = Arc::clone(&self.container.broker);
        let seen = Arc::clone(&prompts);
        let mut answers: VecDeque<Answer> = answers.into();

        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let SessionEvent::InteractionRequested { id, kind } = event {
                    seen.lock().push(kind);
                    match answers.pop_front().flatten() {
                        Some(value) => broker.resolve(id, value),
                        None => broker.cancel(id),
                    };
                }
            }
        });
        ScriptedUi { prompts, task }
    }

    /// Stop the runtime.
    pub async fn shutdown(&self) {
        self.runtime.shutdown().await;
    }
}

impl Default for SandboxSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A running UI simulation.
pub struct ScriptedUi {
    prompts: Arc<Mutex<Vec<InputKind>>>,
    task: JoinHandle<()>,
}

impl ScriptedUi {
    /// Prompts opened so far.
    pub fn prompts(&self) -> Vec<InputKind> {
        self.prompts.lock().clone()
    }
}

impl Drop for ScriptedUi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A password answer.
pub fn password(value: &str) -> Answer {
    Some(InputValue::Password(value.to_string()))
}

/// A network choice answer.
pub fn network(value: EvmNetwork) -> Answer {
    Some(InputValue::Network(value))
}

/// Messages of every notice currently buffered in `subscription`.
pub fn drain_notices(subscription: &mut Subscription) -> Vec<String> {
    subscription
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            SessionEvent::Notice(notice) => Some(notice.message),
            _ => None,
        })
        .collect()
}

/// Poll `condition` until it holds or [`SETTLE`] elapses.
pub async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + SETTLE;
    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
