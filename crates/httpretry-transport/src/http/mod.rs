//! HTTP transport and the retrying service built on it
//!
//! [`HttpTransport`] performs single attempts over reqwest;
//! [`HttpRetryService`] drives any [`Transport`](crate::Transport) through a
//! retry strategy.

pub mod client;
pub mod service;

pub use client::HttpTransport;
pub use service::HttpRetryService;
