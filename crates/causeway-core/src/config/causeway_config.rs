//! Top-level Causeway configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{StatsConfig, SubscriberConfig, WaitConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CAUSEWAY_*`)
/// 2. Config file (TOML)
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CausewayConfig {
    pub subscriber: SubscriberConfig,
    pub wait: WaitConfig,
    pub stats: StatsConfig,
}

impl CausewayConfig {
    /// Load configuration: defaults, then `path` if given, then the
    /// process environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides_from(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a TOML file. Unknown keys are ignored, missing keys default.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `CAUSEWAY_*` overrides resolved through `lookup`.
    ///
    /// Recognized: `CAUSEWAY_BAREBACK`, `CAUSEWAY_WORKERS`,
    /// `CAUSEWAY_WAIT_TIMEOUT_SECS` (`none` clears the timeout).
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("CAUSEWAY_BAREBACK") {
            self.subscriber.bareback = parse_bool("CAUSEWAY_BAREBACK", &raw)?;
        }
        if let Some(raw) = lookup("CAUSEWAY_WORKERS") {
            self.subscriber.workers = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "CAUSEWAY_WORKERS".to_string(),
                message: format!("expected a positive integer, got {raw:?}"),
            })?;
        }
        if let Some(raw) = lookup("CAUSEWAY_WAIT_TIMEOUT_SECS") {
            let raw = raw.trim();
            self.wait.timeout_secs = if raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(raw.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "CAUSEWAY_WAIT_TIMEOUT_SECS".to_string(),
                    message: format!("expected seconds or \"none\", got {raw:?}"),
                })?)
            };
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subscriber.endpoint_field.is_empty() {
            return Err(invalid("subscriber.endpoint_field", "must not be empty"));
        }
        if self.subscriber.workers == 0 {
            return Err(invalid("subscriber.workers", "must be greater than 0"));
        }
        if self.wait.initial_backoff_ms == 0 {
            return Err(invalid("wait.initial_backoff_ms", "must be greater than 0"));
        }
        if self.wait.max_backoff_ms < self.wait.initial_backoff_ms {
            return Err(invalid(
                "wait.max_backoff_ms",
                "must be at least wait.initial_backoff_ms",
            ));
        }
        if self.wait.timeout_secs == Some(0) {
            return Err(invalid(
                "wait.timeout_secs",
                "must be greater than 0 (omit it to wait until cancelled)",
            ));
        }
        if self.stats.latency_window == 0 {
            return Err(invalid("stats.latency_window", "must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_bool(field: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a boolean, got {raw:?}"),
        }),
    }
}
