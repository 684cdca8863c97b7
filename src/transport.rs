//! HTTP transport used by the catalog client.
//!
//! The client only ever talks to the network through the `Transport` trait,
//! which keeps request construction testable without a live server. The
//! production implementation wraps a blocking reqwest client.

use crate::config::ClientConfig;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised below the HTTP status level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(String),

    /// The request could not be sent or its body could not be read
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },
}

/// Header list sent with a request, as `(name, value)` pairs.
pub type Headers = [(&'static str, String)];

/// Query parameters appended to a GET request.
pub type Params = [(&'static str, String)];

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as UTF-8
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true when the body holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Capability to issue HTTP requests.
///
/// Implementations return a `Response` for every status code the server
/// answers with; only failures to talk to the server at all are errors.
pub trait Transport {
    /// Sends a GET request with the given headers and query parameters.
    fn get(&self, url: &str, headers: &Headers, params: &Params)
    -> Result<Response, TransportError>;

    /// Sends a POST request with the given headers and raw body.
    fn post(&self, url: &str, headers: &Headers, body: &str) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(
        &self,
        url: &str,
        headers: &Headers,
        params: &Params,
    ) -> Result<Response, TransportError> {
        (**self).get(url, headers, params)
    }

    fn post(&self, url: &str, headers: &Headers, body: &str) -> Result<Response, TransportError> {
        (**self).post(url, headers, body)
    }
}

/// Transport backed by `reqwest::blocking::Client`.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default request timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ClientBuildFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport using the timeout from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::with_timeout(config.timeout())
    }

    /// Sends a prepared request and reads the whole body.
    fn execute(
        url: &str,
        headers: &Headers,
        mut request: reqwest::blocking::RequestBuilder,
    ) -> Result<Response, TransportError> {
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().map_err(|e| TransportError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| TransportError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Response { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
        headers: &Headers,
        params: &Params,
    ) -> Result<Response, TransportError> {
        let request = self.client.get(url).query(params);
        Self::execute(url, headers, request)
    }

    fn post(&self, url: &str, headers: &Headers, body: &str) -> Result<Response, TransportError> {
        let request = self.client.post(url).body(body.to_string());
        Self::execute(url, headers, request)
    }
}
