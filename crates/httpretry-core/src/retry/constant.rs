//! Fixed delay between retries.

use super::strategy::{MAX_SAFE_DELAY_MS, RetryStrategy};
use crate::error::{ConfigError, Result};

/// Retries up to `max_attempts` times, waiting the same interval each time.
///
/// Suited to downstreams whose recovery time is known and bounded.
///
/// # Examples
///
/// ```rust
/// use httpretry_core::retry::{ConstantInterval, RetryStrategy};
///
/// # fn example() -> Result<(), httpretry_core::error::ConfigError> {
/// let strategy = ConstantInterval::new(3, 500)?;
/// assert_eq!(strategy.delay_ms(0), 500);
/// assert_eq!(strategy.delay_ms(2), 500);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantInterval {
    max_attempts: u32,
    interval_ms: u64,
}

impl ConstantInterval {
    const NAME: &'static str = "ConstantInterval";

    /// Create a constant-interval strategy.
    ///
    /// An interval of 0 is allowed and retries immediately.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidMaxAttempts`] if `max_attempts` is 0.
    pub fn new(max_attempts: u32, interval_ms: u64) -> Result<Self> {
        if max_attempts < 1 {
            return Err(ConfigError::InvalidMaxAttempts {
                strategy: Self::NAME,
            });
        }
        Ok(Self {
            max_attempts,
            interval_ms: interval_ms.min(MAX_SAFE_DELAY_MS),
        })
    }

    /// Create a constant-interval strategy from a signed interval.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidInterval`] if `interval_ms` is negative, and
    /// everything [`ConstantInterval::new`] rejects.
    pub fn from_signed(max_attempts: u32, interval_ms: i64) -> Result<Self> {
        let interval_ms = u64::try_from(interval_ms).map_err(|_| ConfigError::InvalidInterval {
            strategy: Self::NAME,
            value: interval_ms,
        })?;
        Self::new(max_attempts, interval_ms)
    }

    /// The fixed wait between retries.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

impl RetryStrategy for ConstantInterval {
    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    fn delay_ms(&self, _attempt: u32) -> u64 {
        self.interval_ms
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
