//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable names read by [`AppConfig::from_env`].
pub mod env_keys {
    pub const DB_PATH: &str = "PARTNER_ONBOARD_DB_PATH";
    pub const SUBMIT_LATENCY_MS: &str = "PARTNER_ONBOARD_SUBMIT_LATENCY_MS";
    pub const SUBMIT_FAILURE_RATE: &str = "PARTNER_ONBOARD_SUBMIT_FAILURE_RATE";
    pub const LOG_DIR: &str = "PARTNER_ONBOARD_LOG_DIR";
}

/// Process-wide configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the libSQL file backing the key-value store.
    pub db_path: PathBuf,
    /// Fixed latency of the simulated submission round trip.
    pub submit_latency: Duration,
    /// Probability in [0, 1] that a simulated submission fails.
    pub submit_failure_rate: f64,
    /// Directory for rolling log files. Logs go to stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/partner-onboard.db"),
            submit_latency: Duration::from_millis(2000),
            submit_failure_rate: 0.0,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Build a config from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(env_keys::DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(env_keys::SUBMIT_LATENCY_MS) {
            let ms: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: env_keys::SUBMIT_LATENCY_MS.to_string(),
                message: format!("{e}"),
            })?;
            config.submit_latency = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(env_keys::SUBMIT_FAILURE_RATE) {
            let rate: f64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: env_keys::SUBMIT_FAILURE_RATE.to_string(),
                message: format!("{e}"),
            })?;
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidValue {
                    key: env_keys::SUBMIT_FAILURE_RATE.to_string(),
                    message: format!("{rate} is outside 0.0..=1.0"),
                });
            }
            config.submit_failure_rate = rate;
        }

        config.log_dir = lookup(env_keys::LOG_DIR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}
