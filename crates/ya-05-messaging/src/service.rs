//! # Messaging Service
//!
//! Mail and broadcast writes go through the message core with fixed
//! protocol constants:
//!
//! | Operation | Service code | Feed            | Personal |
//! |-----------|--------------|-----------------|----------|
//! | mail      | 1            | `MAILING_FEED_ID` | -      |
//! | broadcast | 5            | `UNIQUE_FEED_ID`  | yes    |

use crate::domain::{MessagingError, CONTENT_UNAVAILABLE_NOTICE};
use crate::ports::{ActivitySink, MessagingApi, MessagingContext};
use async_trait::async_trait;
use shared_bus::Notice;
use shared_types::collaborators::{
    BlockchainController, BroadcastRequest, MessageCore, SendMessageRequest, WalletController,
};
use shared_types::entities::{
    Address, AuthorizationState, Balance, DecryptedContent, MessageEnvelope, OutgoingContent,
    SendOutcome, WalletAccount,
};
use shared_types::networks::EvmNetwork;
use shared_types::protocol::{ServiceCode, MAILING_FEED_ID, UNIQUE_FEED_ID};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Messaging service.
pub struct MessagingService {
    controller: Arc<dyn WalletController>,
    core: Arc<dyn MessageCore>,
    chains: Vec<Arc<dyn BlockchainController>>,
    context: Arc<dyn MessagingContext>,
    activity: Arc<dyn ActivitySink>,
}

impl MessagingService {
    /// Create the service.
    pub fn new(
        controller: Arc<dyn WalletController>,
        core: Arc<dyn MessageCore>,
        chains: Vec<Arc<dyn BlockchainController>>,
        context: Arc<dyn MessagingContext>,
        activity: Arc<dyn ActivitySink>,
    ) -> Self {
        Self {
            controller,
            core,
            chains,
            context,
            activity,
        }
    }

    fn require_authorized(&self) -> Result<(), MessagingError> {
        match self.context.authorization_state() {
            AuthorizationState::Authorized => Ok(()),
            state => Err(MessagingError::NotAuthorized { state }),
        }
    }

    fn landed(&self, network: EvmNetwork, broadcast: bool, outcome: &SendOutcome) {
        info!(
            network = %network,
            broadcast,
            tx_hash = %outcome.tx_hash,
            "Message written"
        );
        self.activity.message_sent(network, broadcast, &outcome.tx_hash);
    }
}

#[async_trait]
impl MessagingApi for MessagingService {
    async fn send_message(
        &self,
        recipients: Vec<Address>,
        content: OutgoingContent,
    ) -> Result<SendOutcome, MessagingError> {
        let (Some(sender), Some(network)) = (self.context.account(), self.context.active_network())
        else {
            return Err(MessagingError::NoAccount);
        };
        self.require_authorized()?;

        let request = SendMessageRequest {
            sender,
            recipients,
            content,
            service_code: ServiceCode::Mail,
            feed_id: MAILING_FEED_ID,
        };
        debug!(network = %network, recipients = request.recipients.len(), "Sending mail");

        let outcome = self
            .core
            .send_message(self.controller.as_ref(), request, network)
            .await
            .map_err(|e| {
                warn!(network = %network, error = %e, "Mail write failed");
                MessagingError::Write(e)
            })?;
        self.landed(network, false, &outcome);
        Ok(outcome)
    }

    async fn broadcast_message(
        &self,
        content: OutgoingContent,
        network: Option<EvmNetwork>,
    ) -> Result<SendOutcome, MessagingError> {
        let sender = self.context.account().ok_or(MessagingError::NoAccount)?;
        self.require_authorized()?;

        let network = match network {
            Some(network) => {
                if self.context.active_network() != Some(network)
                    && !self.context.switch_network(network).await
                {
                    return Err(MessagingError::SwitchFailed { network });
                }
                network
            }
            None => self
                .context
                .choose_network()
                .await
                .ok_or(MessagingError::NetworkNotSelected)?,
        };

        let request = BroadcastRequest {
            sender,
            content,
            service_code: ServiceCode::Broadcast,
            feed_id: UNIQUE_FEED_ID,
            is_personal: true,
        };

        let outcome = self
            .core
            .broadcast_message(self.controller.as_ref(), request, network)
            .await
            .map_err(|e| {
                warn!(network = %network, error = %e, "Broadcast write failed");
                MessagingError::Write(e)
            })?;
        self.landed(network, true, &outcome);
        Ok(outcome)
    }

    async fn decode_message(
        &self,
        message: &MessageEnvelope,
        recipient: &WalletAccount,
    ) -> Option<DecryptedContent> {
        let content = match self.core.get_message_content(message).await {
            Ok(Some(content)) if !content.corrupted => content,
            Ok(_) => {
                self.activity.notify(Notice::error(CONTENT_UNAVAILABLE_NOTICE));
                return None;
            }
            Err(e) => {
                warn!(msg_id = %message.msg_id, error = %e, "Content fetch failed");
                self.activity.notify(Notice::error(CONTENT_UNAVAILABLE_NOTICE));
                return None;
            }
        };

        let decrypted = if message.is_broadcast {
            self.core.decrypt_broadcast_content(message, &content)
        } else {
            self.core
                .decrypt_message_content(recipient, message, &content)
                .await
        };

        match decrypted {
            Ok(decrypted) => Some(decrypted),
            Err(e) => {
                warn!(msg_id = %message.msg_id, error = %e, "Decryption failed");
                None
            }
        }
    }

    async fn get_balances_of(&self, address: &Address) -> BTreeMap<EvmNetwork, Balance> {
        let mut balances = BTreeMap::new();
        for chain in &self.chains {
            match chain.get_balance(address).await {
                Ok(balance) => {
                    balances.insert(chain.network(), balance);
                }
                Err(e) => {
                    debug!(network = %chain.network(), error = %e, "Balance query failed, skipping");
                }
            }
        }
        balances
    }
}
