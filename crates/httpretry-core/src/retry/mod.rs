//! Retry strategies and the attempt loop.
//!
//! # Key Types
//!
//! - [`RetryStrategy`] - The contract every strategy implements
//! - [`NoRetry`], [`ConstantInterval`], [`ExponentialBackoff`],
//!   [`PolynomialBackoff`], [`FibonacciBackoff`] - The strategies
//! - [`RetryStrategyOptions`] - Tagged configuration selecting one of them
//! - [`execute`] / [`execute_with_cancellation`] - Drive an operation through
//!   attempt, wait and retry
//!
//! # Examples
//!
//! ```rust
//! use httpretry_core::retry::{RetryStrategyOptions, execute};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let strategy = RetryStrategyOptions::from_toml_str(
//!     r#"
//!     type = "interval"
//!     max_attempts = 3
//!     interval_ms = 10
//!     "#,
//! )?
//! .build()?;
//!
//! let body = execute(strategy.as_ref(), "https://example.com", || async {
//!     Ok::<_, std::io::Error>("pong")
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

mod constant;
mod executor;
mod exponential;
mod fibonacci;
mod no_retry;
mod options;
mod polynomial;
mod strategy;

pub use constant::ConstantInterval;
pub use executor::{RetryError, execute, execute_with_cancellation};
pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use fibonacci::FibonacciBackoff;
pub use no_retry::NoRetry;
pub use options::{
    ENV_DEGREE, ENV_INITIAL_DELAY_MS, ENV_INTERVAL_MS, ENV_MAX_ATTEMPTS, ENV_STRATEGY,
    RetryStrategyOptions,
};
pub use polynomial::PolynomialBackoff;
pub use strategy::{MAX_SAFE_DELAY_MS, RetryStrategy};

/// Base delay used by exponential and Fibonacci backoff when none is given.
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;
