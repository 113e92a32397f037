//! Configuration for the retrying HTTP service

use httpretry_core::error::ConfigError;
use httpretry_core::retry::RetryStrategyOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "HTTP_RETRY_TIMEOUT_SECS";
/// Environment variable holding the connect timeout in seconds.
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "HTTP_RETRY_CONNECT_TIMEOUT_SECS";

/// Wiring-time configuration: which strategy to use and how to reach the
/// network.
///
/// ```toml
/// timeout_secs = 15
///
/// [strategy]
/// type = "exponential"
/// max_attempts = 4
/// initial_delay_ms = 200
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRetryConfig {
    /// Default retry strategy for every call
    pub strategy: RetryStrategyOptions,

    /// Per-attempt request timeout
    #[serde(rename = "timeout_secs", with = "secs")]
    pub timeout: Duration,

    /// Connection timeout
    #[serde(rename = "connect_timeout_secs", with = "secs")]
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// User-Agent header sent with every request
    pub user_agent: Option<String>,
}

impl Default for HttpRetryConfig {
    fn default() -> Self {
        Self {
            strategy: RetryStrategyOptions::NoRetry,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            user_agent: None,
        }
    }
}

impl HttpRetryConfig {
    /// Create a configuration using `strategy` and default network settings.
    pub fn with_strategy(strategy: RetryStrategyOptions) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Parse configuration from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the strategy through [`RetryStrategyOptions::from_env`] plus:
    /// - `HTTP_RETRY_TIMEOUT_SECS` for the request timeout
    /// - `HTTP_RETRY_CONNECT_TIMEOUT_SECS` for the connect timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::with_strategy(RetryStrategyOptions::from_env()?);

        if let Some(secs) = secs_var(ENV_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = secs_var(ENV_CONNECT_TIMEOUT_SECS)? {
            config.connect_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn secs_var(name: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::Env {
                name: name.to_string(),
                reason: format!("cannot parse '{raw}': {e}"),
            }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::Env {
            name: name.to_string(),
            reason: e.to_string(),
        }),
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
