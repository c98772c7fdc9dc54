// crates/lake-catalog-client/src/transport/mod.rs
// ============================================================================
// Module: Transport Seam
// Description: Request/response types and the pluggable transport trait.
// Purpose: Let clients run against live HTTP, a recorder, or a playback store.
// Dependencies: serde, serde_json, url
// ============================================================================

//! ## Overview
//! Clients never touch HTTP directly; they build an [`HttpRequest`] and hand it
//! to a [`Transport`]. Bodies are JSON values so recordings can store them
//! verbatim. Transports report only transport faults; status interpretation
//! happens in the clients.
//! Invariants:
//! - Transports are `Send + Sync` and shared as `Arc<dyn Transport>`.
//! - A transport never retries.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;
pub mod playback;
pub mod recording;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::TransportError;

// ============================================================================
// SECTION: Request and Response
// ============================================================================

/// HTTP methods used by the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read.
    Get,
    /// Create or replace.
    Put,
    /// Partial update.
    Patch,
    /// Remove.
    Delete,
}

impl Method {
    /// Returns the canonical method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully resolved URL, including `api-version`.
    pub url: Url,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Creates a request without a body.
    #[must_use]
    pub const fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the path and query with the scheme and host removed.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        path_and_query(&self.url)
    }
}

/// Inbound response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; non-JSON text is kept as a JSON string.
    pub body: Option<Value>,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Returns the path and query of a URL, without scheme or host.
#[must_use]
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Sends a request and returns the raw response.
pub trait Transport: Send + Sync {
    /// Sends a single request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response could be obtained.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
