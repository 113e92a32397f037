//! Exponential backoff.

use super::DEFAULT_INITIAL_DELAY_MS;
use super::strategy::{MAX_SAFE_DELAY_MS, RetryStrategy, saturating_delay};
use crate::error::{ConfigError, Result};

/// Doubles the wait after every failed retry.
///
/// # Mathematical Formula
///
/// For retry index `n` (0-indexed, counted after the original request):
/// ```text
/// delay = min(initial_delay_ms * 2^n, MAX_SAFE_DELAY_MS)
/// ```
///
/// Geometric spacing puts exponentially less pressure on a downstream that
/// keeps failing, which is the usual congestion-avoidance behaviour.
///
/// # Examples
///
/// ```rust
/// use httpretry_core::retry::{ExponentialBackoff, RetryStrategy};
///
/// # fn example() -> Result<(), httpretry_core::error::ConfigError> {
/// let backoff = ExponentialBackoff::builder()
///     .max_attempts(5)
///     .initial_delay_ms(100)
///     .build()?;
///
/// assert_eq!(backoff.delay_ms(0), 100);
/// assert_eq!(backoff.delay_ms(3), 800);
/// # Ok(())
/// # }
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: O(1)
/// - **CPU**: O(1) per delay, one checked power and one checked multiply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    max_attempts: u32,
    initial_delay_ms: u64,
}

impl ExponentialBackoff {
    const NAME: &'static str = "ExponentialBackoff";

    /// Create an exponential backoff.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidMaxAttempts`] if `max_attempts` is 0
    /// - [`ConfigError::InvalidInitialDelay`] if `initial_delay_ms` is 0
    pub fn new(max_attempts: u32, initial_delay_ms: u64) -> Result<Self> {
        if max_attempts < 1 {
            return Err(ConfigError::InvalidMaxAttempts {
                strategy: Self::NAME,
            });
        }
        if initial_delay_ms == 0 {
            return Err(ConfigError::InvalidInitialDelay {
                strategy: Self::NAME,
            });
        }
        Ok(Self {
            max_attempts,
            initial_delay_ms,
        })
    }

    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// The delay before the first retry.
    pub fn initial_delay_ms(&self) -> u64 {
        self.initial_delay_ms
    }
}

impl RetryStrategy for ExponentialBackoff {
    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    fn delay_ms(&self, attempt: u32) -> u64 {
        // 2^64 already overflows, so a failed checked_pow means saturation
        2u64.checked_pow(attempt).map_or(MAX_SAFE_DELAY_MS, |factor| {
            saturating_delay(self.initial_delay_ms, factor)
        })
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Builder for configuring [`ExponentialBackoff`].
///
/// # Examples
///
/// ```rust
/// use httpretry_core::retry::ExponentialBackoff;
///
/// # fn example() -> Result<(), httpretry_core::error::ConfigError> {
/// // initial_delay_ms defaults to 1000
/// let backoff = ExponentialBackoff::builder().max_attempts(4).build()?;
/// assert_eq!(backoff.initial_delay_ms(), 1000);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_attempts: Option<u32>,
    initial_delay_ms: Option<u64>,
}

impl ExponentialBackoffBuilder {
    /// Set the maximum number of retries.
    ///
    /// Required; an unset value fails validation like 0 does.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the delay before the first retry.
    ///
    /// Default: 1000ms
    pub fn initial_delay_ms(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = Some(delay_ms);
        self
    }

    /// Validate and build the [`ExponentialBackoff`].
    pub fn build(self) -> Result<ExponentialBackoff> {
        ExponentialBackoff::new(
            self.max_attempts.unwrap_or(0),
            self.initial_delay_ms.unwrap_or(DEFAULT_INITIAL_DELAY_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_exponential_delay_calculation() {
        let backoff = ExponentialBackoff::new(5, 100).unwrap();

        // Attempt 0: 100ms * 2^0 = 100ms
        assert_eq!(backoff.delay_ms(0), 100);

        // Attempt 1: 100ms * 2^1 = 200ms
        assert_eq!(backoff.delay_ms(1), 200);

        // Attempt 2: 100ms * 2^2 = 400ms
        assert_eq!(backoff.delay_ms(2), 400);

        // Attempt 3: 100ms * 2^3 = 800ms
        assert_eq!(backoff.delay_ms(3), 800);
    }

    #[test]
    fn test_large_attempt_saturates() {
        let backoff = ExponentialBackoff::new(5, 100).unwrap();

        for attempt in [47, 53, 63, 64, 1_000, u32::MAX] {
            assert_eq!(
                backoff.delay_ms(attempt),
                MAX_SAFE_DELAY_MS,
                "attempt {} should saturate",
                attempt
            );
        }
    }

    #[test]
    fn test_should_retry_bounded_by_max_attempts() {
        let backoff = ExponentialBackoff::new(5, 100).unwrap();
        assert!((0..5).all(|attempt| backoff.should_retry(attempt)));
        assert!(!backoff.should_retry(5));
        assert_eq!(backoff.max_attempts(), 5);
    }

    #[test]
    fn test_builder_defaults() {
        let backoff = ExponentialBackoff::builder().max_attempts(3).build().unwrap();

        assert_eq!(backoff.max_attempts, 3);
        assert_eq!(backoff.initial_delay_ms, 1000);
    }

    #[test]
    fn test_builder_requires_max_attempts() {
        assert!(matches!(
            ExponentialBackoff::builder().initial_delay_ms(10).build(),
            Err(ConfigError::InvalidMaxAttempts { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_initial_delay() {
        assert_eq!(
            ExponentialBackoff::new(3, 0),
            Err(ConfigError::InvalidInitialDelay {
                strategy: "ExponentialBackoff"
            })
        );
    }

    #[test]
    fn test_rejects_zero_max_attempts() {
        assert_eq!(
            ExponentialBackoff::new(0, 100),
            Err(ConfigError::InvalidMaxAttempts {
                strategy: "ExponentialBackoff"
            })
        );
    }

    #[test]
    fn test_saturates_past_safe_range() {
        let backoff = ExponentialBackoff::new(60, 1).unwrap();
        assert_eq!(backoff.delay_ms(52), 1 << 52);
        assert_eq!(backoff.delay_ms(53), MAX_SAFE_DELAY_MS);
    }
}
