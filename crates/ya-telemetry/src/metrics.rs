//! Prometheus metrics for the session runtime.
//!
//! All metrics follow the naming convention: `ya_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // AUTHORIZATION METRICS (Subsystem 4)
    // =========================================================================

    /// Authorization state transitions by target state
    pub static ref AUTH_TRANSITIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("ya_authorization_transitions_total", "Authorization state transitions"),
        &["to"]
    ).expect("metric creation failed");

    /// 1 for the current authorization state, 0 for the others
    pub static ref AUTH_STATE: IntGaugeVec = IntGaugeVec::new(
        Opts::new("ya_authorization_state", "Current authorization state"),
        &["state"]
    ).expect("metric creation failed");

    // =========================================================================
    // PUBLICATION METRICS (Subsystem 3)
    // =========================================================================

    /// Faucet publications by network and outcome
    pub static ref KEY_PUBLICATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("ya_faucet_publications_total", "Key publications through the faucet"),
        &["network", "outcome"]  // outcome: success/failure
    ).expect("metric creation failed");

    // =========================================================================
    // MESSAGING METRICS (Subsystem 5)
    // =========================================================================

    /// Message writes by network and kind
    pub static ref MESSAGES_SENT: IntCounterVec = IntCounterVec::new(
        Opts::new("ya_messaging_writes_total", "Messages written"),
        &["network", "kind"]  // kind: mail/broadcast
    ).expect("metric creation failed");

    // =========================================================================
    // INTERACTION METRICS
    // =========================================================================

    /// Prompts opened by kind
    pub static ref PROMPTS_OPENED: IntCounterVec = IntCounterVec::new(
        Opts::new("ya_interaction_prompts_total", "User prompts opened"),
        &["kind"]  // kind: password/network
    ).expect("metric creation failed");

    /// Notices shown by level
    pub static ref NOTICES: IntCounterVec = IntCounterVec::new(
        Opts::new("ya_interaction_notices_total", "User-visible notices"),
        &["level"]
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT BUS METRICS
    // =========================================================================

    /// Bus events routed by topic
    pub static ref BUS_EVENTS: CounterVec = CounterVec::new(
        Opts::new("ya_event_bus_events_total", "Session bus events routed"),
        &["topic"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(AUTH_TRANSITIONS.clone()),
        Box::new(AUTH_STATE.clone()),
        Box::new(KEY_PUBLICATIONS.clone()),
        Box::new(MESSAGES_SENT.clone()),
        Box::new(PROMPTS_OPENED.clone()),
        Box::new(NOTICES.clone()),
        Box::new(BUS_EVENTS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Mark `state` as the current authorization state.
pub fn set_auth_state(state: &str, all_states: &[&str]) {
    for candidate in all_states {
        AUTH_STATE
            .with_label_values(&[*candidate])
            .set(i64::from(*candidate == state));
    }
}

/// Encode all metrics as Prometheus text format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
