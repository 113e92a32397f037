//! Transport and service error types

use httpretry_core::error::ConfigError;
use httpretry_core::retry::RetryError;
use thiserror::Error;

/// Result type for single-attempt transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Failure of one attempt at an HTTP request.
///
/// These are transient from the service's point of view: every variant is
/// retried while the strategy allows, and none of them reaches a service
/// caller directly.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be built or sent
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    Status {
        /// Response status code
        status: u16,
        /// Response body, lossily decoded
        body: String,
    },

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Timeout error
    #[error("Timeout")]
    Timeout,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP method the transport does not speak
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

impl TransportError {
    /// Status code for [`TransportError::Status`] failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors surfaced to callers of [`HttpRetryService`](crate::HttpRetryService).
#[derive(Debug, Error)]
pub enum HttpRetryError {
    /// Invalid retry or transport configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The underlying HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] TransportError),

    /// Request body could not be encoded; no attempt was made
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// The strategy declined another retry
    #[error("HTTP call failed after {attempts} attempts; last error message: {last_error}")]
    Exhausted {
        /// `max_attempts` of the strategy used for the call
        attempts: u32,
        /// The last underlying failure
        #[source]
        last_error: TransportError,
    },

    /// The call was cancelled before it completed
    #[error("HTTP call cancelled after {retries} retries")]
    Cancelled {
        /// Retries that had been started before cancellation
        retries: u32,
    },
}

impl HttpRetryError {
    /// The last transport failure of an exhausted call.
    pub fn last_error(&self) -> Option<&TransportError> {
        match self {
            Self::Exhausted { last_error, .. } => Some(last_error),
            _ => None,
        }
    }
}

impl From<RetryError<TransportError>> for HttpRetryError {
    fn from(err: RetryError<TransportError>) -> Self {
        match err {
            RetryError::Exhausted {
                attempts, source, ..
            } => Self::Exhausted {
                attempts,
                last_error: source,
            },
            RetryError::Cancelled { retries, .. } => Self::Cancelled { retries },
        }
    }
}
