// crates/lake-catalog-client/src/transport/http.rs
// ============================================================================
// Module: Live HTTP Transport
// Description: Blocking reqwest transport for the management API.
// Purpose: Send requests with bounded time, bounded bodies, and no redirects.
// Dependencies: reqwest, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`HttpTransport`] issues one blocking request per call. Redirects are never
//! followed, the response body is read through a byte limit, and the bearer
//! token (when configured) is attached per request and never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde_json::Value;
use tracing::debug;

use super::HttpRequest;
use super::HttpResponse;
use super::Method;
use super::Transport;
use crate::error::TransportError;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Settings for [`HttpTransport`].
///
/// # Invariants
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - `timeout` applies to the full request lifecycle.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// User agent for outbound requests.
    pub user_agent: String,
    /// Maximum response size in bytes.
    pub max_response_bytes: usize,
    /// Optional bearer token attached to every request.
    pub bearer_token: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("lake-catalog-client/", env!("CARGO_PKG_VERSION")).to_string(),
            max_response_bytes: 8 * 1024 * 1024,
            bearer_token: None,
        }
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Live HTTP transport.
pub struct HttpTransport {
    /// Transport settings.
    config: HttpTransportConfig,
    /// Shared blocking client.
    client: Client,
}

impl HttpTransport {
    /// Builds a transport from its settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] when the client cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| TransportError::Http(format!("http client build failed: {err}")))?;
        Ok(Self {
            config,
            client,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, request.url.clone());
        if let Some(token) = &self.config.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let mut response = builder
            .send()
            .map_err(|err| TransportError::Http(format!("request failed: {err}")))?;
        let status = response.status().as_u16();
        let bytes = read_response_limited(&mut response, self.config.max_response_bytes)?;
        debug!(method = %request.method, status, bytes = bytes.len(), "http response received");
        Ok(HttpResponse {
            status,
            body: decode_body(&bytes),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a response body as JSON, keeping non-JSON text as a string.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned())),
    )
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| TransportError::Limit("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(TransportError::Limit("http response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|err| TransportError::Http(format!("failed to read response: {err}")))?;
    if buf.len() > max_bytes {
        return Err(TransportError::Limit("http response exceeds size limit".to_string()));
    }
    Ok(buf)
}
