//! The strategy that never retries.

use super::strategy::RetryStrategy;

/// Declines every retry.
///
/// This is the fallback when no policy is configured: code paths that go
/// through the retry loop stay valid, they just make a single attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRetry;

impl NoRetry {
    /// Create the no-retry strategy.
    pub const fn new() -> Self {
        Self
    }
}

impl RetryStrategy for NoRetry {
    fn should_retry(&self, _attempt: u32) -> bool {
        false
    }

    fn delay_ms(&self, _attempt: u32) -> u64 {
        0
    }

    fn max_attempts(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_retries() {
        let strategy = NoRetry::new();
        for attempt in [0, 1, 2, 100, u32::MAX] {
            assert!(!strategy.should_retry(attempt));
            assert_eq!(strategy.delay_ms(attempt), 0);
        }
        assert_eq!(strategy.max_attempts(), 0);
    }
}
