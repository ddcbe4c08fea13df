//! # Ylide-Auth Telemetry
//!
//! Structured logging and Prometheus metrics for the session runtime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ya_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `YA_SERVICE_NAME` | `ylide-auth` | Service name in logs |
//! | `YA_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `YA_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `YA_JSON_LOGS` | `false` | JSON log lines |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_text, register_metrics, set_auth_state, AUTH_STATE, AUTH_TRANSITIONS, BUS_EVENTS,
    KEY_PUBLICATIONS, MESSAGES_SENT, NOTICES, PROMPTS_OPENED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// A metric could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Increment a metric, optionally by label values.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
