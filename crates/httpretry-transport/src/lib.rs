//! Retrying HTTP client for httpretry
//!
//! Wraps a pluggable [`Transport`] in an [`HttpRetryService`] that retries
//! failed calls according to a strategy from `httpretry-core`.
//!
//! # Architecture
//!
//! - **Transport trait**: one attempt at one HTTP request, no retrying
//! - **HTTP transport**: reqwest-backed [`HttpTransport`]; non-2xx is a failure
//! - **Retry service**: GET/POST/PUT/DELETE with a default strategy and
//!   per-call overrides
//! - **Configuration**: [`HttpRetryConfig`] from TOML or environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use httpretry_core::retry::ConstantInterval;
//! use httpretry_transport::HttpRetryService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = HttpRetryService::new()?;
//! let patient = ConstantInterval::new(5, 250)?;
//!
//! let response = service
//!     .get("https://example.com/health", None, Some(&patient))
//!     .await?;
//! println!("{}", response.status);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod http;
pub mod traits;

pub use config::HttpRetryConfig;
pub use error::{HttpRetryError, Result, TransportError};
pub use http::{HttpRetryService, HttpTransport};
pub use traits::{HttpRequest, HttpResponse, RequestOptions, Transport};
