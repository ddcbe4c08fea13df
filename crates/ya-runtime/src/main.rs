//! # Ylide Session Demo
//!
//! Runs a full session against the in-memory sandbox: login, automatic
//! key publication, a direct message, a broadcast and a balance lookup.
//! A simulated UI task answers every prompt and logs every notice.
//!
//! Environment: see `ServiceConfig` (`YA_*`) and `TelemetryConfig`
//! (`YA_LOG_LEVEL`, `YA_JSON_LOGS`, ...).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use shared_bus::{
    EventFilter, EventTopic, InputKind, InputValue, InteractionBroker, SessionEvent, Subscription,
};
use shared_types::entities::{Address, AuthorizationState, OutgoingContent, WalletAccount};
use shared_types::networks::EvmNetwork;
use ya_01_wallet_session::WalletSessionApi;
use ya_05_messaging::MessagingApi;
use ya_runtime::{ServiceConfig, SessionContainer, SessionRuntime};
use ya_telemetry::{gather_text, init_telemetry, TelemetryConfig};

const DEMO_PASSWORD: &str = "correct horse battery staple";
const DEMO_SEED: [u8; 32] = [0x59; 32];

/// Answers prompts the way a user clicking through the UI would.
async fn simulate_ui(mut events: Subscription, broker: Arc<InteractionBroker>, network: EvmNetwork) {
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::InteractionRequested { id, kind } => {
                let value = match kind {
                    InputKind::Password { address, retry } => {
                        info!(address = %address, retry, "UI: password entered");
                        InputValue::Password(DEMO_PASSWORD.to_string())
                    }
                    InputKind::NetworkChoice => {
                        info!(network = %network, "UI: network chosen");
                        InputValue::Network(network)
                    }
                };
                broker.resolve(id, value);
            }
            SessionEvent::Notice(notice) => {
                info!(level = ?notice.level, "UI notice: {}", notice.message);
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry)?;

    let config = ServiceConfig::from_env()?;
    let publish_network = config.auth.publish_network;
    info!(config = %serde_json::to_string(&config)?, "Loaded configuration");

    let (container, sandbox) = SessionContainer::sandbox(config, DEMO_SEED);
    let ui_events = container.bus.subscribe(EventFilter::topics(vec![
        EventTopic::Interaction,
        EventTopic::Notices,
    ]));
    tokio::spawn(simulate_ui(
        ui_events,
        Arc::clone(&container.broker),
        publish_network,
    ));

    let runtime = SessionRuntime::new(container);
    runtime.start().await?;
    let c = runtime.container();

    let me = WalletAccount::evm("0x5f0c0e5a3d1f9b7e2c4a6b8d0e1f2a3b4c5d6e7f");
    sandbox.wallet.set_pending_login(Some(me.clone()));
    c.session
        .connect_account()
        .await
        .context("wallet login failed")?;

    if !runtime
        .wait_for_state(AuthorizationState::Authorized, Duration::from_secs(30))
        .await
    {
        runtime.shutdown().await;
        bail!("session did not reach AUTHORIZED");
    }
    info!(address = %me.address, "Session authorized");

    let recipient = Address::new("0x00000000000000000000000000000000000000b0");
    match c
        .messaging
        .send_message(
            vec![recipient],
            OutgoingContent {
                subject: "hello".into(),
                content: "first message from the sandbox".into(),
            },
        )
        .await
    {
        Ok(outcome) => info!(tx_hash = %outcome.tx_hash, network = %outcome.blockchain, "Message sent"),
        Err(e) => warn!(error = %e, "Message not sent"),
    }

    match c
        .messaging
        .broadcast_message(
            OutgoingContent {
                subject: "announcement".into(),
                content: "now on Ylide".into(),
            },
            None,
        )
        .await
    {
        Ok(outcome) => info!(tx_hash = %outcome.tx_hash, network = %outcome.blockchain, "Broadcast sent"),
        Err(e) => warn!(error = %e, "Broadcast not sent"),
    }

    sandbox.ledger.set_balance(publish_network, &me.address, 1.25);
    for (network, balance) in c.messaging.get_balances_of(&me.address).await {
        info!(network = %network, balance = %balance.original, "Balance");
    }

    println!("{}", gather_text()?);
    runtime.shutdown().await;
    Ok(())
}
