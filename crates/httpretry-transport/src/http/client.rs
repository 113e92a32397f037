//! HTTP transport client implementation
//!
//! Implements the Transport trait on top of reqwest. Each `send_http` call is
//! exactly one attempt; non-2xx responses come back as failures so the
//! retrying service can act on them.

use crate::config::HttpRetryConfig;
use crate::error::{Result, TransportError};
use crate::traits::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP transport implementation
///
/// Handles:
/// - Connection pooling
/// - Request and connect timeouts
/// - Mapping of non-success statuses to [`TransportError::Status`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpRetryConfig::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: &HttpRetryConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            timeout: config.timeout,
        })
    }

    /// The default per-attempt timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse> {
        if !is_supported(&request.method) {
            return Err(TransportError::UnsupportedMethod(request.method.to_string()));
        }

        let mut url =
            Url::parse(&request.url).map_err(|e| TransportError::Http(format!("{}: {e}", request.url)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        debug!(method = %request.method, url = %url, "sending request");
        let mut req = self.client.request(request.method.clone(), url);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (key.to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?
            .to_vec();

        if !(200..300).contains(&status) {
            return Err(TransportError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(HttpResponse::new(status, headers, body))
    }
}

fn is_supported(method: &reqwest::Method) -> bool {
    use reqwest::Method;
    [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::HEAD,
        Method::OPTIONS,
    ]
    .contains(method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new().expect("Failed to create transport");
        assert_eq!(transport.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_http_transport_with_config() {
        let config = HttpRetryConfig {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(1),
            pool_max_idle_per_host: 2,
            ..Default::default()
        };

        let transport = HttpTransport::with_config(&config).expect("Failed to create transport");
        assert_eq!(transport.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unsupported_method_rejected() {
        let transport = HttpTransport::new().unwrap();
        let method = reqwest::Method::from_bytes(b"PURGE").unwrap();
        let err = transport
            .send_http(HttpRequest::new(method, "http://localhost/"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedMethod(m) if m == "PURGE"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_failure() {
        let transport = HttpTransport::new().unwrap();
        let err = transport
            .send_http(HttpRequest::new(reqwest::Method::GET, "not a url"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }
}
