#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core retry abstractions for outbound HTTP calls.
//!
//! This crate answers two questions for a failed call: *should it be retried*
//! and *how long to wait first*. It provides:
//!
//! - **One strategy contract** via the [`RetryStrategy`](retry::RetryStrategy) trait
//! - **Five strategies**: no retry, constant interval, exponential,
//!   polynomial and Fibonacci backoff
//! - **Configuration shapes** via [`RetryStrategyOptions`](retry::RetryStrategyOptions),
//!   loadable from TOML, JSON or the environment
//! - **The attempt loop** via [`execute`](retry::execute), which drives any async
//!   operation through attempt, wait and retry with tracing events per attempt
//!
//! Strategies are immutable after construction. Their answers depend only on
//! the attempt index and the construction parameters, so one instance can be
//! shared by any number of concurrent calls.
//!
//! # Examples
//!
//! ```rust
//! use httpretry_core::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let strategy = ExponentialBackoff::new(3, 100)?;
//!
//! let value = execute(&strategy, "https://example.com/health", || async {
//!     Ok::<_, std::io::Error>(42)
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod retry;


/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use httpretry_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::ConfigError;
    pub use crate::retry::{
        ConstantInterval, ExponentialBackoff, FibonacciBackoff, NoRetry, PolynomialBackoff,
        RetryError, RetryStrategy, RetryStrategyOptions, execute, execute_with_cancellation,
    };
}
