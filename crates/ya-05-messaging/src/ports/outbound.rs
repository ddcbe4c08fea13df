//! # Outbound Ports
//!
//! Session state the messaging service reads, and where it reports.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::Notice;
use shared_types::entities::{AuthorizationState, TxHash, WalletAccount};
use shared_types::networks::EvmNetwork;
use std::collections::VecDeque;

/// Current session view - outbound port.
#[async_trait]
pub trait MessagingContext: Send + Sync {
    /// Current account.
    fn account(&self) -> Option<WalletAccount>;

    /// Network the wallet is on.
    fn active_network(&self) -> Option<EvmNetwork>;

    /// Current authorization state.
    fn authorization_state(&self) -> AuthorizationState;

    /// Ask the user for a network and switch to it.
    async fn choose_network(&self) -> Option<EvmNetwork>;

    /// Move the wallet to `network`.
    async fn switch_network(&self, network: EvmNetwork) -> bool;
}

/// Activity and notices - outbound port.
pub trait ActivitySink: Send + Sync {
    /// A message write landed.
    fn message_sent(&self, network: EvmNetwork, broadcast: bool, tx_hash: &TxHash);

    /// Show a notice.
    fn notify(&self, notice: Notice);
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Context with settable fields and scripted network choices.
#[derive(Debug)]
pub struct FixedContext {
    account: Mutex<Option<WalletAccount>>,
    network: Mutex<Option<EvmNetwork>>,
    state: Mutex<AuthorizationState>,
    choices: Mutex<VecDeque<Option<EvmNetwork>>>,
    reject_switch: Mutex<bool>,
}

impl FixedContext {
    /// An authorized session on `network`.
    pub fn authorized(account: WalletAccount, network: EvmNetwork) -> Self {
        Self {
            account: Mutex::new(Some(account)),
            network: Mutex::new(Some(network)),
            state: Mutex::new(AuthorizationState::Authorized),
            choices: Mutex::new(VecDeque::new()),
            reject_switch: Mutex::new(false),
        }
    }

    /// Replace the account.
    pub fn set_account(&self, account: Option<WalletAccount>) {
        *self.account.lock() = account;
    }

    /// Replace the active network.
    pub fn set_network(&self, network: Option<EvmNetwork>) {
        *self.network.lock() = network;
    }

    /// Replace the authorization state.
    pub fn set_state(&self, state: AuthorizationState) {
        *self.state.lock() = state;
    }

    /// Queue an answer for the next network prompt.
    pub fn push_choice(&self, choice: Option<EvmNetwork>) {
        self.choices.lock().push_back(choice);
    }

    /// Make switches fail.
    pub fn set_reject_switch(&self, reject: bool) {
        *self.reject_switch.lock() = reject;
    }
}

#[async_trait]
impl MessagingContext for FixedContext {
    fn account(&self) -> Option<WalletAccount> {
        self.account.lock().clone()
    }

    fn active_network(&self) -> Option<EvmNetwork> {
        *self.network.lock()
    }

    fn authorization_state(&self) -> AuthorizationState {
        *self.state.lock()
    }

    async fn choose_network(&self) -> Option<EvmNetwork> {
        let choice = self.choices.lock().pop_front().flatten();
        if choice.is_some() {
            *self.network.lock() = choice;
        }
        choice
    }

    async fn switch_network(&self, network: EvmNetwork) -> bool {
        if *self.reject_switch.lock() {
            return false;
        }
        *self.network.lock() = Some(network);
        true
    }
}

/// Sink recording writes and notices.
#[derive(Debug, Default)]
pub struct RecordingActivity {
    sent: Mutex<Vec<(EvmNetwork, bool, TxHash)>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingActivity {
    /// Writes recorded so far.
    pub fn sent(&self) -> Vec<(EvmNetwork, bool, TxHash)> {
        self.sent.lock().clone()
    }

    /// Notices recorded so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl ActivitySink for RecordingActivity {
    fn message_sent(&self, network: EvmNetwork, broadcast: bool, tx_hash: &TxHash) {
        self.sent.lock().push((network, broadcast, tx_hash.clone()));
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
