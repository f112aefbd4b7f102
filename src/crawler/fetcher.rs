//! HTTP transport
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - HEAD probes that report status, content-type and content-length
//! - GET requests that return headers and the raw body
//! - Sorting `reqwest` failures into the crawl's error taxonomy

use crate::config::UserAgentConfig;
use crate::FetchError;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;

/// Metadata returned by a HEAD probe
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    /// HTTP status code
    pub status: u16,

    /// Lower-cased Content-Type header value
    pub content_type: Option<String>,

    /// Content-Length parsed as a float, so `3e8` is accepted
    pub content_length: Option<f64>,
}

impl Probe {
    /// Extracts the probe fields from a response's headers
    pub fn from_headers(status: u16, headers: &HeaderMap) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_lowercase());

        let content_length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|len| len.is_finite());

        Self {
            status,
            content_type,
            content_length,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A fully fetched response
#[derive(Debug)]
pub struct Fetched {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HeaderMap,

    /// Raw body bytes
    pub body: Vec<u8>,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects follow the reqwest default policy. No timeouts are set, so a
/// stalled server stalls the run. Response bodies are not transparently
/// decompressed, which keeps content-length describing the bytes written.
///
/// # Example
///
/// ```no_run
/// use ballot_harvest::config::UserAgentConfig;
/// use ballot_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(config.header_value()).build()
}

/// Sequential HEAD/GET transport over a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a freshly built client
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Sends a HEAD request and returns the probe metadata
    pub async fn head(&self, url: &str) -> Result<Probe, FetchError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        Ok(Probe::from_headers(
            response.status().as_u16(),
            response.headers(),
        ))
    }

    /// Sends a GET request and reads the whole body
    ///
    /// Non-success statuses are returned, not raised; callers decide.
    pub async fn get(&self, url: &str) -> Result<Fetched, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| classify_error(&e))?;

        Ok(Fetched {
            final_url,
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// Sorts a `reqwest` error into the crawl's failure taxonomy
///
/// | Condition                               | Failure         |
/// |-----------------------------------------|-----------------|
/// | Request could not be built (bad scheme) | Scheme          |
/// | Certificate / TLS / handshake in chain  | SecureTransport |
/// | Connect, timeout, redirect limit, body  | Unreachable     |
/// | Anything else                           | Unclassified    |
pub fn classify_error(error: &reqwest::Error) -> FetchError {
    let message = error.to_string();

    if error.is_builder() {
        return FetchError::Scheme(message);
    }

    // The top-level message embeds the URL, so only the causes are inspected
    let causes = source_chain(error).to_lowercase();
    if ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| causes.contains(needle))
    {
        return FetchError::SecureTransport(message);
    }

    if error.is_connect() || error.is_timeout() || error.is_redirect() || error.is_body() {
        FetchError::Unreachable(message)
    } else {
        FetchError::Unclassified(message)
    }
}

/// Joins the messages of every underlying cause
fn source_chain(error: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        parts.push(cause.to_string());
        current = cause.source();
    }
    parts.join(": ")
}
