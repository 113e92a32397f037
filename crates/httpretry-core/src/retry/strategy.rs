//! The contract shared by every retry strategy.

use std::fmt;
use std::time::Duration;

/// Ceiling for every computed delay, in milliseconds.
///
/// This is the largest integer that survives a round trip through an IEEE-754
/// double (`2^53 - 1`), so delays stay exact when they are exported to
/// systems that store numbers as floats.
pub const MAX_SAFE_DELAY_MS: u64 = (1 << 53) - 1;

/// Decides whether a failed call is retried and how long to wait first.
///
/// A strategy is an immutable value: every answer is a pure function of the
/// `attempt` argument and the parameters fixed at construction. There is no
/// per-call state, so one instance can serve any number of concurrent calls.
///
/// # Attempt index
///
/// `attempt` is the zero-based count of retries already performed for the
/// call. After the original request fails the loop asks
/// `should_retry(0)`; if that is granted it waits `delay_ms(0)` and sends the
/// first retry. The original request is never counted as a retry.
///
/// # Examples
///
/// ```rust
/// use httpretry_core::retry::{ConstantInterval, RetryStrategy};
///
/// # fn example() -> Result<(), httpretry_core::error::ConfigError> {
/// let strategy = ConstantInterval::new(3, 500)?;
///
/// assert!(strategy.should_retry(2));
/// assert!(!strategy.should_retry(3));
/// assert_eq!(strategy.delay_ms(7), 500);
/// # Ok(())
/// # }
/// ```
pub trait RetryStrategy: fmt::Debug + Send + Sync {
    /// Whether retry number `attempt` (zero-based) is still permitted.
    fn should_retry(&self, attempt: u32) -> bool;

    /// Milliseconds to wait before performing retry number `attempt`.
    ///
    /// Never negative and never above [`MAX_SAFE_DELAY_MS`], however large
    /// `attempt` gets.
    fn delay_ms(&self, attempt: u32) -> u64;

    /// The configured ceiling on retries.
    ///
    /// Used by `should_retry` implementations and for reporting. The attempt
    /// loop does not enforce it separately.
    fn max_attempts(&self) -> u32;

    /// [`delay_ms`](RetryStrategy::delay_ms) as a [`Duration`].
    fn delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.delay_ms(attempt))
    }
}

/// Multiplies two delay factors, saturating at [`MAX_SAFE_DELAY_MS`].
pub(crate) fn saturating_delay(base_ms: u64, factor: u64) -> u64 {
    base_ms
        .checked_mul(factor)
        .map_or(MAX_SAFE_DELAY_MS, |delay| delay.min(MAX_SAFE_DELAY_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_safe_delay_value() {
        assert_eq!(MAX_SAFE_DELAY_MS, 9_007_199_254_740_991);
    }

    #[test]
    fn test_saturating_delay() {
        assert_eq!(saturating_delay(100, 4), 400);
        assert_eq!(saturating_delay(100, 0), 0);
        assert_eq!(saturating_delay(MAX_SAFE_DELAY_MS, 2), MAX_SAFE_DELAY_MS);
        assert_eq!(saturating_delay(u64::MAX, u64::MAX), MAX_SAFE_DELAY_MS);
    }
}
