//! Configuration errors raised while building retry strategies.

use thiserror::Error;

/// Result type alias for strategy construction and configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid retry configuration.
///
/// Raised eagerly by strategy constructors and configuration loaders. A
/// strategy that failed validation is never handed out, so there is nothing
/// to recover: the configuration has to be fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `max_attempts` was below 1.
    #[error("{strategy}: Max attempts must be at least 1.")]
    InvalidMaxAttempts {
        /// Strategy that rejected the value
        strategy: &'static str,
    },

    /// A delay base that must be strictly positive was 0.
    #[error("{strategy}: Initial delay must be greater than 0.")]
    InvalidInitialDelay {
        /// Strategy that rejected the value
        strategy: &'static str,
    },

    /// Polynomial degree was not a positive integer.
    #[error("{strategy}: Degree must be a positive integer.")]
    InvalidDegree {
        /// Strategy that rejected the value
        strategy: &'static str,
    },

    /// Constant interval was negative.
    #[error("{strategy}: Interval milliseconds must be 0 or greater (got {value}).")]
    InvalidInterval {
        /// Strategy that rejected the value
        strategy: &'static str,
        /// The rejected interval
        value: i64,
    },

    /// A TOML or JSON document could not be parsed into strategy options.
    #[error("Invalid retry strategy configuration: {0}")]
    Parse(String),

    /// An environment variable was missing or malformed.
    #[error("Invalid environment variable {name}: {reason}")]
    Env {
        /// Variable name
        name: String,
        /// What was wrong with it
        reason: String,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_strategy() {
        let err = ConfigError::InvalidMaxAttempts {
            strategy: "ExponentialBackoff",
        };
        assert_eq!(
            err.to_string(),
            "ExponentialBackoff: Max attempts must be at least 1."
        );

        let err = ConfigError::InvalidInterval {
            strategy: "ConstantInterval",
            value: -5,
        };
        assert!(err.to_string().contains("got -5"));
    }

    #[test]
    fn test_parse_errors_convert() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(ConfigError::from(json_err), ConfigError::Parse(_)));
    }
}
