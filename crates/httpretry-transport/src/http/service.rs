//! Retrying HTTP service
//!
//! Wraps a [`Transport`] with a default [`RetryStrategy`] and exposes
//! GET/POST/PUT/DELETE entry points. Every call goes through the attempt loop
//! from `httpretry-core`; transport failures are absorbed until the strategy
//! gives up, at which point a single [`HttpRetryError::Exhausted`] is
//! returned.

use super::client::HttpTransport;
use crate::config::HttpRetryConfig;
use crate::error::HttpRetryError;
use crate::traits::{HttpRequest, HttpResponse, RequestOptions, Transport};
use http::Method;
use httpretry_core::retry::{RetryStrategy, RetryStrategyOptions, execute_with_cancellation};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// HTTP client that retries failed calls according to a [`RetryStrategy`].
///
/// The default strategy is fixed when the service is created; any single
/// call may pass its own strategy instead. Strategies are immutable, so a
/// service can be cloned and used from many tasks at once.
///
/// # Examples
///
/// ```rust,no_run
/// use httpretry_core::retry::RetryStrategyOptions;
/// use httpretry_transport::{HttpRetryConfig, HttpRetryService};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = HttpRetryService::from_config(&HttpRetryConfig::with_strategy(
///     RetryStrategyOptions::Exponential {
///         max_attempts: 3,
///         initial_delay_ms: 200,
///     },
/// ))?;
///
/// let response = service.get("https://example.com/items", None, None).await?;
/// let items: serde_json::Value = response.json()?;
/// # Ok(())
/// # }
/// ```
pub struct HttpRetryService<T = HttpTransport> {
    transport: Arc<T>,
    strategy: Arc<dyn RetryStrategy>,
}

impl HttpRetryService<HttpTransport> {
    /// Create a service with default network settings and no retries.
    pub fn new() -> Result<Self, HttpRetryError> {
        Self::from_config(&HttpRetryConfig::default())
    }

    /// Create a service from wiring-time configuration.
    ///
    /// # Errors
    ///
    /// - [`HttpRetryError::Config`] if the strategy options fail validation
    /// - [`HttpRetryError::Client`] if the HTTP client cannot be built
    pub fn from_config(config: &HttpRetryConfig) -> Result<Self, HttpRetryError> {
        let strategy = config.strategy.build()?;
        let transport = HttpTransport::with_config(config).map_err(HttpRetryError::Client)?;
        Ok(Self::with_strategy(transport, strategy))
    }
}

impl<T: Transport> HttpRetryService<T> {
    /// Wrap `transport`, building the default strategy from `options`.
    pub fn with_transport(
        transport: T,
        options: &RetryStrategyOptions,
    ) -> Result<Self, HttpRetryError> {
        Ok(Self::with_strategy(transport, options.build()?))
    }

    /// Wrap `transport` with an already-built default strategy.
    pub fn with_strategy(transport: T, strategy: Arc<dyn RetryStrategy>) -> Self {
        Self {
            transport: Arc::new(transport),
            strategy,
        }
    }

    /// The default strategy used when a call passes none.
    pub fn strategy(&self) -> &dyn RetryStrategy {
        self.strategy.as_ref()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url`, retrying per `strategy` or the service default.
    pub async fn get(
        &self,
        url: &str,
        options: Option<&RequestOptions>,
        strategy: Option<&dyn RetryStrategy>,
    ) -> Result<HttpResponse, HttpRetryError> {
        self.execute(build_request(Method::GET, url, options), strategy)
            .await
    }

    /// POST `body` as JSON to `url`.
    ///
    /// # Errors
    ///
    /// [`HttpRetryError::Encode`] before any attempt if `body` cannot be
    /// serialized.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: Option<&RequestOptions>,
        strategy: Option<&dyn RetryStrategy>,
    ) -> Result<HttpResponse, HttpRetryError> {
        let request = build_request(Method::POST, url, options)
            .with_json(body)
            .map_err(|e| HttpRetryError::Encode(e.to_string()))?;
        self.execute(request, strategy).await
    }

    /// PUT `body` as JSON to `url`.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: Option<&RequestOptions>,
        strategy: Option<&dyn RetryStrategy>,
    ) -> Result<HttpResponse, HttpRetryError> {
        let request = build_request(Method::PUT, url, options)
            .with_json(body)
            .map_err(|e| HttpRetryError::Encode(e.to_string()))?;
        self.execute(request, strategy).await
    }

    /// DELETE `url`.
    pub async fn delete(
        &self,
        url: &str,
        options: Option<&RequestOptions>,
        strategy: Option<&dyn RetryStrategy>,
    ) -> Result<HttpResponse, HttpRetryError> {
        self.execute(build_request(Method::DELETE, url, options), strategy)
            .await
    }

    /// Send an arbitrary request through the retry loop.
    pub async fn execute(
        &self,
        request: HttpRequest,
        strategy: Option<&dyn RetryStrategy>,
    ) -> Result<HttpResponse, HttpRetryError> {
        self.execute_with_cancellation(request, strategy, &CancellationToken::new())
            .await
    }

    /// Send a request through the retry loop, stopping when `cancel` fires.
    ///
    /// # Errors
    ///
    /// - [`HttpRetryError::Exhausted`] once the strategy declines a retry
    /// - [`HttpRetryError::Cancelled`] if `cancel` fires first
    pub async fn execute_with_cancellation(
        &self,
        request: HttpRequest,
        strategy: Option<&dyn RetryStrategy>,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, HttpRetryError> {
        let strategy = strategy.unwrap_or(self.strategy.as_ref());
        let endpoint = request.url.clone();

        execute_with_cancellation(strategy, &endpoint, cancel, || {
            self.transport.send_http(request.clone())
        })
        .await
        .map_err(HttpRetryError::from)
    }
}

fn build_request(method: Method, url: &str, options: Option<&RequestOptions>) -> HttpRequest {
    let request = HttpRequest::new(method, url);
    match options {
        Some(options) => request.with_options(options),
        None => request,
    }
}

impl<T> Clone for HttpRetryService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            strategy: Arc::clone(&self.strategy),
        }
    }
}

impl<T> fmt::Debug for HttpRetryService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRetryService")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TransportError};
    use async_trait::async_trait;
    use httpretry_core::retry::{ConstantInterval, NoRetry};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then answers 200 with `ok`.
    #[derive(Default)]
    struct ScriptedTransport {
        failures: u32,
        calls: AtomicU32,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn failing(failures: u32) -> Self {
            Self {
                failures,
                ..Default::default()
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(TransportError::Connection("connection refused".to_string()))
            } else {
                Ok(HttpResponse::new(200, Default::default(), b"ok".to_vec()))
            }
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let service = HttpRetryService::with_transport(
            ScriptedTransport::failing(2),
            &RetryStrategyOptions::Interval {
                max_attempts: 3,
                interval_ms: 10,
            },
        )
        .unwrap();

        let response = service.get("http://svc/items", None, None).await.unwrap();

        assert_eq!(response.text().unwrap(), "ok");
        assert_eq!(service.transport().calls(), 3);
    }

    #[tokio::test]
    async fn test_default_no_retry_fails_after_one_call() {
        let service = HttpRetryService::with_strategy(ScriptedTransport::failing(1), Arc::new(NoRetry));

        let err = service.get("http://svc/items", None, None).await.unwrap_err();

        assert_eq!(service.transport().calls(), 1);
        assert_eq!(
            err.to_string(),
            "HTTP call failed after 0 attempts; last error message: Connection error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_per_call_strategy_overrides_default() {
        let service = HttpRetryService::with_strategy(ScriptedTransport::failing(1), Arc::new(NoRetry));
        let override_strategy = ConstantInterval::new(1, 0).unwrap();

        let response = service
            .delete("http://svc/items/7", None, Some(&override_strategy))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(service.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_post_sends_json_on_every_attempt() {
        let service = HttpRetryService::with_strategy(
            ScriptedTransport::failing(1),
            Arc::new(ConstantInterval::new(2, 0).unwrap()),
        );
        let options = RequestOptions::new().header("x-request-id", "r-1");

        service
            .post(
                "http://svc/items",
                &serde_json::json!({"sku": "A-1"}),
                Some(&options),
                None,
            )
            .await
            .unwrap();

        let seen = service.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for request in seen.iter() {
            assert_eq!(request.method, Method::POST);
            assert_eq!(request.body.as_deref(), Some(br#"{"sku":"A-1"}"#.as_slice()));
            assert_eq!(
                request.headers.get("x-request-id").map(String::as_str),
                Some("r-1")
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_options_rejected_at_construction() {
        let err = HttpRetryService::with_transport(
            ScriptedTransport::default(),
            &RetryStrategyOptions::Polynomial {
                max_attempts: 3,
                initial_delay_ms: 100,
                degree: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, HttpRetryError::Config(_)));
    }

    #[tokio::test]
    async fn test_cancelled_call() {
        let service = HttpRetryService::with_strategy(
            ScriptedTransport::failing(u32::MAX),
            Arc::new(ConstantInterval::new(3, 0).unwrap()),
        );
        let token = CancellationToken::new();
        token.cancel();

        let err = service
            .execute_with_cancellation(
                HttpRequest::new(Method::PUT, "http://svc/items/1"),
                None,
                &token,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, HttpRetryError::Cancelled { retries: 0 }));
        assert_eq!(service.transport().calls(), 0);
    }
}
