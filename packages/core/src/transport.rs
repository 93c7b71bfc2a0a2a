//! The HTTP transport contract and its default `reqwest` implementation.
//!
//! Resources never talk to the network directly. They hand a
//! [`FetchRequest`] to whatever [`Transport`] the owning
//! [`Client`](crate::Client) was built with, which makes the fetch path easy
//! to replace with a test double or a caching layer.

use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::Method;
use url::Url;

use crate::config::ClientConfig;

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Failures below the HTTP semantics layer: DNS, connect, TLS, timeouts, I/O.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The `reqwest` client failed to build, send, or read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport failure, for custom [`Transport`] implementations.
    #[error("{0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// One outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub method: Method,
    pub uri: Url,
    /// Header name/value pairs, sent in order.
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn get(uri: Url) -> Self {
        Self {
            method: Method::GET,
            uri,
            headers: Vec::new(),
        }
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A complete response: status, headers and the fully-read body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Synchronous fetch capability used by [`Resource`](crate::Resource).
///
/// Implementations block the caller until the whole body has been read.
/// Retry and timeout policy belong here, not in the navigation core.
pub trait Transport: Send + Sync {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError>;
}

/// Default [`Transport`] backed by one reused, connection-pooling
/// `reqwest::blocking::Client`.
///
/// Must not be called from inside an async runtime; `reqwest`'s blocking
/// client panics there.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    /// Build a transport with the timeout and user agent from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already-configured client.
    pub fn from_client(client: HttpClient) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        let mut req = self
            .client
            .request(request.method.clone(), request.uri.clone());
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let response = req.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                // Non-UTF-8 header values cannot carry a usable content type.
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes()?.to_vec();

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}
