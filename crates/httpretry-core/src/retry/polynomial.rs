//! Polynomial backoff.

use super::strategy::{MAX_SAFE_DELAY_MS, RetryStrategy, saturating_delay};
use crate::error::{ConfigError, Result};

/// Grows the wait as `attempt^degree`, scaled by `initial_delay_ms`.
///
/// ```text
/// delay = min(initial_delay_ms * n^degree, MAX_SAFE_DELAY_MS)
/// ```
///
/// The growth rate sits between constant and exponential and is tuned by
/// `degree`. Retry index 0 always yields a zero delay, so the first retry goes
/// out straight after the original failure.
///
/// # Examples
///
/// ```rust
/// use httpretry_core::retry::{PolynomialBackoff, RetryStrategy};
///
/// # fn example() -> Result<(), httpretry_core::error::ConfigError> {
/// let backoff = PolynomialBackoff::new(4, 100, 2)?;
/// assert_eq!(backoff.delay_ms(0), 0);
/// assert_eq!(backoff.delay_ms(3), 900);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialBackoff {
    max_attempts: u32,
    initial_delay_ms: u64,
    degree: u32,
}

impl PolynomialBackoff {
    const NAME: &'static str = "PolynomialBackoff";

    /// Create a polynomial backoff.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidMaxAttempts`] if `max_attempts` is 0
    /// - [`ConfigError::InvalidInitialDelay`] if `initial_delay_ms` is 0
    /// - [`ConfigError::InvalidDegree`] if `degree` is 0
    pub fn new(max_attempts: u32, initial_delay_ms: u64, degree: u32) -> Result<Self> {
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
        if degree < 1 {
            return Err(ConfigError::InvalidDegree {
                strategy: Self::NAME,
            });
        }
        Ok(Self {
            max_attempts,
            initial_delay_ms,
            degree,
        })
    }

    /// The polynomial degree.
    pub fn degree(&self) -> u32 {
        self.degree
    }
}

impl RetryStrategy for PolynomialBackoff {
    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    fn delay_ms(&self, attempt: u32) -> u64 {
        u64::from(attempt)
            .checked_pow(self.degree)
            .map_or(MAX_SAFE_DELAY_MS, |factor| {
                saturating_delay(self.initial_delay_ms, factor)
            })
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
