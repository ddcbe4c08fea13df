//! # Outbound Ports
//!
//! User interaction the coordinator depends on.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::networks::EvmNetwork;
use std::collections::VecDeque;

/// User prompts and notices - outbound port.
#[async_trait]
pub trait NetworkPrompts: Send + Sync {
    /// Suspend until the user picks a network or cancels.
    async fn choose_network(&self) -> Option<EvmNetwork>;

    /// Show an error to the user.
    fn notify_error(&self, message: String);
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Prompts answering from a script, for tests.
#[derive(Debug, Default)]
pub struct ScriptedPrompts {
    choices: Mutex<VecDeque<Option<EvmNetwork>>>,
    errors: Mutex<Vec<String>>,
}

impl ScriptedPrompts {
    /// Queue the answer for the next `choose_network`.
    pub fn push_choice(&self, choice: Option<EvmNetwork>) {
        self.choices.lock().push_back(choice);
    }

    /// Errors shown so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

#[async_trait]
impl NetworkPrompts for ScriptedPrompts {
    async fn choose_network(&self) -> Option<EvmNetwork> {
        self.choices.lock().pop_front().flatten()
    }

    fn notify_error(&self, message: String) {
        self.errors.lock().push(message);
    }
}
