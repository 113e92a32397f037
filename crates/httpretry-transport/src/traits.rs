//! Transport trait and request/response types
//!
//! Defines the collaborator boundary: a [`Transport`] performs exactly one
//! attempt at an HTTP request and reports success or a failure carrying a
//! human-readable message. Retrying happens above this layer.

use crate::error::{Result, TransportError};
use async_trait::async_trait;
use http::Method;
use std::collections::HashMap;
use std::time::Duration;

/// One outgoing HTTP request
///
/// Represents an HTTP request to be sent via the Transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,

    /// Request URL
    pub url: String,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Query parameters appended to the URL
    pub query: Vec<(String, String)>,

    /// Request body (optional)
    pub body: Option<Vec<u8>>,

    /// Per-request timeout overriding the transport default
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Add a header to the request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a JSON body and the matching content type
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized
    pub fn with_json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Apply per-call options
    pub fn with_options(mut self, options: &RequestOptions) -> Self {
        self.headers.extend(
            options
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self.query.extend(options.query.iter().cloned());
        if options.timeout.is_some() {
            self.timeout = options.timeout;
        }
        self
    }
}

/// Per-call request options
///
/// The counterpart of a client-library request config: extra headers, query
/// parameters and a timeout for one call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers
    pub headers: HashMap<String, String>,

    /// Extra query parameters
    pub query: Vec<(String, String)>,

    /// Timeout for each attempt of this call
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP response
///
/// Represents a successful (2xx) response received from the server.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as a string
    pub fn text(&self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    /// Parse response body as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the response body cannot be parsed as valid JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Serialization(e.to_string()))
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Issues single HTTP attempts.
///
/// Implementations must not retry on their own; a failure is reported as a
/// [`TransportError`] and the retrying service decides what happens next.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and receive a response
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_merge_into_request() {
        let options = RequestOptions::new()
            .header("x-request-id", "abc")
            .query("page", "2")
            .timeout(Duration::from_secs(5));

        let request = HttpRequest::new(Method::GET, "https://example.com/items")
            .with_header("accept", "application/json")
            .with_options(&options);

        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_with_json_sets_content_type() {
        let request = HttpRequest::new(Method::POST, "https://example.com")
            .with_json(&serde_json::json!({"name": "widget"}))
            .unwrap();

        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.body.unwrap(), br#"{"name":"widget"}"#);
    }

    #[test]
    fn test_response_helpers() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let response = HttpResponse::new(200, headers, br#"{"id":7}"#.to_vec());

        assert!(response.is_success());
        assert_eq!(response.get_header("content-type"), Some("application/json"));
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], 7);
    }
}
