//! Fibonacci backoff.

use super::DEFAULT_INITIAL_DELAY_MS;
use super::strategy::{MAX_SAFE_DELAY_MS, RetryStrategy, saturating_delay};
use crate::error::{ConfigError, Result};

/// Scales the Fibonacci sequence `1, 1, 2, 3, 5, 8, ...` by `initial_delay_ms`.
///
/// Grows faster than linear and slower than exponential, a gentler
/// alternative to [`ExponentialBackoff`](super::ExponentialBackoff).
///
/// # Examples
///
/// ```rust
/// use httpretry_core::retry::{FibonacciBackoff, RetryStrategy};
///
/// # fn example() -> Result<(), httpretry_core::error::ConfigError> {
/// let backoff = FibonacciBackoff::new(5, 100)?;
/// let delays: Vec<u64> = (0..5).map(|n| backoff.delay_ms(n)).collect();
/// assert_eq!(delays, vec![100, 100, 200, 300, 500]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FibonacciBackoff {
    max_attempts: u32,
    initial_delay_ms: u64,
}

impl FibonacciBackoff {
    const NAME: &'static str = "FibonacciBackoff";

    /// Create a Fibonacci backoff.
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

    /// Create a Fibonacci backoff with the default 1000ms base.
    pub fn with_max_attempts(max_attempts: u32) -> Result<Self> {
        Self::new(max_attempts, DEFAULT_INITIAL_DELAY_MS)
    }
}

impl RetryStrategy for FibonacciBackoff {
    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    fn delay_ms(&self, attempt: u32) -> u64 {
        saturating_delay(self.initial_delay_ms, fibonacci(attempt))
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// `fib(0) = fib(1) = 1`, iterative, saturating at [`MAX_SAFE_DELAY_MS`].
///
/// Stops early once the ceiling is reached, so huge positions cost at most
/// ~80 iterations.
fn fibonacci(position: u32) -> u64 {
    let (mut previous, mut current) = (1u64, 1u64);
    for _ in 2..=position {
        let next = previous.saturating_add(current);
        previous = current;
        current = next;
        if current >= MAX_SAFE_DELAY_MS {
            return MAX_SAFE_DELAY_MS;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_fibonacci_sequence() {
        let sequence: Vec<u64> = (0..10).map(fibonacci).collect();
        assert_eq!(sequence, vec![1, 1, 2, 3, 5, 8, 13, 21, 34, 55]);
    }

    #[test]
    fn test_scaled_delays() {
        let backoff = FibonacciBackoff::new(5, 100).unwrap();

        assert_eq!(backoff.delay_ms(0), 100);
        assert_eq!(backoff.delay_ms(1), 100);
        assert_eq!(backoff.delay_ms(2), 200);
        assert_eq!(backoff.delay_ms(3), 300);
        assert_eq!(backoff.delay_ms(4), 500);
    }

    #[test]
    fn test_large_attempt_saturates() {
        let backoff = FibonacciBackoff::new(5, 100).unwrap();
        assert_eq!(backoff.delay_ms(200), MAX_SAFE_DELAY_MS);
        assert_eq!(backoff.delay_ms(u32::MAX), MAX_SAFE_DELAY_MS);
    }

    #[test]
    fn test_default_initial_delay() {
        let backoff = FibonacciBackoff::with_max_attempts(2).unwrap();
        assert_eq!(backoff.delay_ms(2), 2000);
    }

    #[test]
    fn test_should_retry_bounded_by_max_attempts() {
        let backoff = FibonacciBackoff::new(5, 100).unwrap();
        assert!(backoff.should_retry(4));
        assert!(!backoff.should_retry(5));
    }

    #[rstest]
    #[case::zero_max_attempts(0, 100, ConfigError::InvalidMaxAttempts { strategy: "FibonacciBackoff" })]
    #[case::zero_initial_delay(5, 0, ConfigError::InvalidInitialDelay { strategy: "FibonacciBackoff" })]
    fn test_rejects_invalid_construction(
        #[case] max_attempts: u32,
        #[case] initial_delay_ms: u64,
        #[case] expected: ConfigError,
    ) {
        assert_eq!(FibonacciBackoff::new(max_attempts, initial_delay_ms), Err(expected));
    }

    #[test]
    fn test_with_max_attempts_rejects_zero() {
        assert!(matches!(
            FibonacciBackoff::with_max_attempts(0),
            Err(ConfigError::InvalidMaxAttempts { .. })
        ));
    }
}
