//! Configuration shapes for selecting a strategy at startup.

use super::{
    ConstantInterval, DEFAULT_INITIAL_DELAY_MS, ExponentialBackoff, FibonacciBackoff, NoRetry,
    PolynomialBackoff, RetryStrategy,
};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

/// Environment variable holding the strategy type tag.
pub const ENV_STRATEGY: &str = "HTTP_RETRY_STRATEGY";
/// Environment variable holding `max_attempts`.
pub const ENV_MAX_ATTEMPTS: &str = "HTTP_RETRY_MAX_ATTEMPTS";
/// Environment variable holding `interval_ms`.
pub const ENV_INTERVAL_MS: &str = "HTTP_RETRY_INTERVAL_MS";
/// Environment variable holding `initial_delay_ms`.
pub const ENV_INITIAL_DELAY_MS: &str = "HTTP_RETRY_INITIAL_DELAY_MS";
/// Environment variable holding `degree`.
pub const ENV_DEGREE: &str = "HTTP_RETRY_DEGREE";

/// The closed set of recognized strategy configurations.
///
/// Serialized with a kebab-case `type` tag:
///
/// ```toml
/// type = "polynomial"
/// max_attempts = 4
/// initial_delay_ms = 100
/// degree = 2
/// ```
///
/// Values are only checked for shape here; [`build`](Self::build) runs the
/// strategy constructors and their validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum RetryStrategyOptions {
    /// Disable retries entirely.
    #[default]
    NoRetry,

    /// Constant-delay retries.
    Interval {
        /// Maximum number of retries
        max_attempts: u32,
        /// Fixed wait between retries
        interval_ms: u64,
    },

    /// Exponential backoff.
    Exponential {
        /// Maximum number of retries
        max_attempts: u32,
        /// Delay before the first retry (default 1000)
        #[serde(default = "default_initial_delay_ms")]
        initial_delay_ms: u64,
    },

    /// Polynomial backoff.
    Polynomial {
        /// Maximum number of retries
        max_attempts: u32,
        /// Scale applied to `attempt^degree`
        initial_delay_ms: u64,
        /// Polynomial degree, a positive integer
        degree: u32,
    },

    /// Fibonacci backoff.
    Fibonacci {
        /// Maximum number of retries
        max_attempts: u32,
        /// Scale applied to the Fibonacci sequence (default 1000)
        #[serde(default = "default_initial_delay_ms")]
        initial_delay_ms: u64,
    },
}

fn default_initial_delay_ms() -> u64 {
    DEFAULT_INITIAL_DELAY_MS
}

impl RetryStrategyOptions {
    /// The `type` tag of this configuration.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::NoRetry => "no-retry",
            Self::Interval { .. } => "interval",
            Self::Exponential { .. } => "exponential",
            Self::Polynomial { .. } => "polynomial",
            Self::Fibonacci { .. } => "fibonacci",
        }
    }

    /// Construct and validate the configured strategy.
    ///
    /// # Errors
    ///
    /// Whatever the selected strategy's constructor rejects.
    pub fn build(&self) -> Result<Arc<dyn RetryStrategy>> {
        let strategy: Arc<dyn RetryStrategy> = match *self {
            Self::NoRetry => Arc::new(NoRetry),
            Self::Interval {
                max_attempts,
                interval_ms,
            } => Arc::new(ConstantInterval::new(max_attempts, interval_ms)?),
            Self::Exponential {
                max_attempts,
                initial_delay_ms,
            } => Arc::new(ExponentialBackoff::new(max_attempts, initial_delay_ms)?),
            Self::Polynomial {
                max_attempts,
                initial_delay_ms,
                degree,
            } => Arc::new(PolynomialBackoff::new(
                max_attempts,
                initial_delay_ms,
                degree,
            )?),
            Self::Fibonacci {
                max_attempts,
                initial_delay_ms,
            } => Arc::new(FibonacciBackoff::new(max_attempts, initial_delay_ms)?),
        };
        Ok(strategy)
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Parse options from a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load options from environment variables.
    ///
    /// This will look for:
    /// - `HTTP_RETRY_STRATEGY`: the type tag; unset means `no-retry`
    /// - `HTTP_RETRY_MAX_ATTEMPTS`: required by every other type
    /// - `HTTP_RETRY_INTERVAL_MS`: required by `interval`
    /// - `HTTP_RETRY_INITIAL_DELAY_MS`: required by `polynomial`, optional for
    ///   `exponential` and `fibonacci`
    /// - `HTTP_RETRY_DEGREE`: required by `polynomial`
    pub fn from_env() -> Result<Self> {
        let Ok(tag) = env::var(ENV_STRATEGY) else {
            return Ok(Self::NoRetry);
        };

        let options = match tag.trim() {
            "no-retry" => Self::NoRetry,
            "interval" => Self::Interval {
                max_attempts: required_var(ENV_MAX_ATTEMPTS)?,
                interval_ms: required_var(ENV_INTERVAL_MS)?,
            },
            "exponential" => Self::Exponential {
                max_attempts: required_var(ENV_MAX_ATTEMPTS)?,
                initial_delay_ms: optional_var(ENV_INITIAL_DELAY_MS)?
                    .unwrap_or(DEFAULT_INITIAL_DELAY_MS),
            },
            "polynomial" => Self::Polynomial {
                max_attempts: required_var(ENV_MAX_ATTEMPTS)?,
                initial_delay_ms: required_var(ENV_INITIAL_DELAY_MS)?,
                degree: required_var(ENV_DEGREE)?,
            },
            "fibonacci" => Self::Fibonacci {
                max_attempts: required_var(ENV_MAX_ATTEMPTS)?,
                initial_delay_ms: optional_var(ENV_INITIAL_DELAY_MS)?
                    .unwrap_or(DEFAULT_INITIAL_DELAY_MS),
            },
            other => {
                return Err(ConfigError::Env {
                    name: ENV_STRATEGY.to_string(),
                    reason: format!("unknown retry strategy type '{other}'"),
                });
            }
        };
        Ok(options)
    }
}

fn optional_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Env {
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

fn required_var<T: std::str::FromStr>(name: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    optional_var(name)?.ok_or_else(|| ConfigError::Env {
        name: name.to_string(),
        reason: "not set".to_string(),
    })
}
