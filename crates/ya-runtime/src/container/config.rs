//! # Service Configuration
//!
//! Per-component configuration collected in one place, with environment
//! overrides:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `YA_PUBLISH_NETWORK` | `auth.publish_network` |
//! | `YA_SETTLE_DELAY_MS` | `auth.settle_delay_ms` |
//! | `YA_REQUIRE_IDENTITY` | `auth.require_identity` |
//! | `YA_FAUCET_REGISTRAR` | `faucet.registrar` |
//! | `YA_FAUCET_TIMEOUT_SECS` | `faucet.confirmation_timeout_secs` |
//! | `YA_PROMPT_TIMEOUT_SECS` | `interaction.prompt_timeout_secs` |

use serde::{Deserialize, Serialize};
use shared_bus::{InteractionConfig, DEFAULT_CHANNEL_CAPACITY};
use shared_types::networks::EvmNetwork;
use thiserror::Error;
use ya_03_faucet_publisher::FaucetConfig;
use ya_04_authorization::AuthConfig;

/// Complete session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Authorization state machine.
    pub auth: AuthConfig,
    /// Faucet publisher.
    pub faucet: FaucetConfig,
    /// Prompt broker.
    pub interaction: InteractionConfig,
    /// Session bus channel capacity.
    pub bus_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            faucet: FaucetConfig::default(),
            interaction: InteractionConfig::default(),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable could not be parsed.
    #[error("{var}: invalid value {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// The publish network has no faucet relay.
    #[error("publish network {0} has no faucet")]
    NoFaucet(EvmNetwork),
}

impl ServiceConfig {
    /// Config for tests: short delays and timeouts, no identity gate.
    pub fn for_testing() -> Self {
        Self {
            auth: AuthConfig::for_testing(),
            faucet: FaucetConfig::for_testing(),
            interaction: InteractionConfig::for_testing(),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup, then validate.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("YA_PUBLISH_NETWORK") {
            self.auth.publish_network =
                EvmNetwork::from_name(&value).ok_or(ConfigError::InvalidValue {
                    var: "YA_PUBLISH_NETWORK",
                    value,
                })?;
        }
        if let Some(value) = lookup("YA_SETTLE_DELAY_MS") {
            self.auth.settle_delay_ms = parse("YA_SETTLE_DELAY_MS", value)?;
        }
        if let Some(value) = lookup("YA_REQUIRE_IDENTITY") {
            self.auth.require_identity = parse_flag("YA_REQUIRE_IDENTITY", value)?;
        }
        if let Some(value) = lookup("YA_FAUCET_REGISTRAR") {
            self.faucet.registrar = parse("YA_FAUCET_REGISTRAR", value)?;
        }
        if let Some(value) = lookup("YA_FAUCET_TIMEOUT_SECS") {
            self.faucet.confirmation_timeout_secs = parse("YA_FAUCET_TIMEOUT_SECS", value)?;
        }
        if let Some(value) = lookup("YA_PROMPT_TIMEOUT_SECS") {
            self.interaction.prompt_timeout_secs = Some(parse("YA_PROMPT_TIMEOUT_SECS", value)?);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.auth.publish_network.has_faucet() {
            return Err(ConfigError::NoFaucet(self.auth.publish_network));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue { var, value }),
    }
}
