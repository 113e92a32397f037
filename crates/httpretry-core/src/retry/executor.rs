//! The attempt loop shared by every retrying call.
//!
//! Per logical call the loop runs a small state machine:
//!
//! ```text
//! Attempting(n) --ok--> Succeeded
//! Attempting(n) --err--> should_retry(n)?
//!     yes --> Waiting(delay_ms(n)) --> Attempting(n + 1)
//!     no  --> Failed(last error)
//! ```
//!
//! The strategy is only ever consulted, never updated: all accounting is the
//! local `attempt` counter, so swapping strategies changes behaviour without
//! touching this loop.

use super::strategy::RetryStrategy;
use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Terminal outcome of a call that did not succeed.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The strategy declined another retry.
    ///
    /// `attempts` is the strategy's `max_attempts`, and `source` is the last
    /// failure the operation returned.
    #[error("call to {endpoint} failed after {attempts} attempts; last error message: {source}")]
    Exhausted {
        /// The call target, usually a URL
        endpoint: String,
        /// `max_attempts` of the strategy that gave up
        attempts: u32,
        /// The last underlying failure
        source: E,
    },

    /// The caller cancelled the call; no further attempt was started.
    #[error("call to {endpoint} cancelled after {retries} retries")]
    Cancelled {
        /// The call target, usually a URL
        endpoint: String,
        /// Retries that had been started before cancellation
        retries: u32,
    },
}

impl<E> RetryError<E> {
    /// The last underlying failure, if the call ran out of retries.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            Self::Exhausted { source, .. } => Some(source),
            Self::Cancelled { .. } => None,
        }
    }

    /// Consume the error and return the last underlying failure, if any.
    pub fn into_last_error(self) -> Option<E> {
        match self {
            Self::Exhausted { source, .. } => Some(source),
            Self::Cancelled { .. } => None,
        }
    }

    /// Whether the call ended through cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Run `operation` until it succeeds or `strategy` declines another retry.
///
/// Attempt 0 is the original call. After a failure, `should_retry(n)` is
/// asked with `n` the number of retries already made; when granted the loop
/// waits `delay_ms(n)` without blocking the runtime, emits an
/// `Attempt {n + 1} to call {endpoint} initializing.` event and tries again.
/// Transient failures never reach the caller individually.
///
/// Dropping the returned future abandons the call, including any pending
/// wait.
///
/// # Examples
///
/// ```rust
/// use httpretry_core::retry::{ConstantInterval, execute};
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let strategy = ConstantInterval::new(3, 10)?;
/// let calls = AtomicU32::new(0);
///
/// let value = execute(&strategy, "https://example.com", || async {
///     if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///         Err(std::io::Error::other("connection reset"))
///     } else {
///         Ok(42)
///     }
/// })
/// .await?;
///
/// assert_eq!(value, 42);
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # Ok(())
/// # }
/// ```
pub async fn execute<S, F, Fut, T, E>(
    strategy: &S,
    endpoint: &str,
    operation: F,
) -> Result<T, RetryError<E>>
where
    S: RetryStrategy + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: StdError,
{
    execute_with_cancellation(strategy, endpoint, &CancellationToken::new(), operation).await
}

/// [`execute`] with an explicit cancellation token.
///
/// The token is observed while an attempt is in flight and during every
/// wait. Once it fires the in-flight attempt is dropped, no further attempt
/// starts, and [`RetryError::Cancelled`] is returned.
pub async fn execute_with_cancellation<S, F, Fut, T, E>(
    strategy: &S,
    endpoint: &str,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    S: RetryStrategy + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: StdError,
{
    let mut attempt: u32 = 0;

    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(endpoint, attempt)),
            outcome = operation() => outcome,
        };

        let err = match outcome {
            Ok(value) => {
                if attempt > 0 {
                    debug!(endpoint, retries = attempt, "call succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !strategy.should_retry(attempt) {
            let attempts = strategy.max_attempts();
            error!(
                endpoint,
                attempts,
                error = %err,
                "HTTP call to {endpoint} failed after {attempts} attempts: {err}"
            );
            return Err(RetryError::Exhausted {
                endpoint: endpoint.to_string(),
                attempts,
                source: err,
            });
        }

        let delay_ms = strategy.delay_ms(attempt);
        debug!(endpoint, attempt, delay_ms, error = %err, "attempt failed, backing off");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(endpoint, attempt)),
            _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {}
        }

        attempt = attempt.saturating_add(1);
        info!(
            endpoint,
            attempt,
            delay_ms,
            "Attempt {attempt} to call {endpoint} initializing."
        );
    }
}

fn cancelled<E>(endpoint: &str, retries: u32) -> RetryError<E> {
    warn!(endpoint, retries, "call cancelled");
    RetryError::Cancelled {
        endpoint: endpoint.to_string(),
        retries,
    }
}
