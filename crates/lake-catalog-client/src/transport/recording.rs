// crates/lake-catalog-client/src/transport/recording.rs
// ============================================================================
// Module: Recording Transport
// Description: Transport wrapper that captures sanitized request/response pairs.
// Purpose: Produce session recordings that playback can replay offline.
// Dependencies: serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`RecordingTransport`] forwards each request to an inner transport and
//! appends the exchange to a shared [`Recording`]. A recording also stores the
//! names and variables a session generated so playback can reproduce them.
//! Invariants:
//! - Headers are never recorded, so `Authorization` never reaches disk.
//! - `password` members of recorded bodies are replaced with [`SANITIZED`].
//! - Absolute `nextLink` values are stored as path and query, so a recording
//!   replays against any host serving the same paths.
//! - Sequence numbers start at 1 and increase by one per exchange.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::HttpRequest;
use super::HttpResponse;
use super::Method;
use super::Transport;
use super::path_and_query;
use crate::error::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Replacement value for sanitized fields.
pub const SANITIZED: &str = "Sanitized";
/// Maximum accepted recording file size in bytes.
pub const MAX_RECORDING_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Recording Model
// ============================================================================

/// Single recorded request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedExchange {
    /// 1-based position within the session.
    pub sequence: u64,
    /// Request method.
    pub method: Method,
    /// Request path and query, without scheme or host.
    pub uri: String,
    /// Sanitized request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    /// Response status.
    pub status: u16,
    /// Sanitized response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,
}

/// Recorded session: exchanges plus generated names and variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Session name; also the file stem.
    pub session: String,
    /// Exchanges in send order.
    #[serde(default)]
    pub entries: Vec<RecordedExchange>,
    /// Generated names keyed by prefix, in generation order.
    #[serde(default)]
    pub names: BTreeMap<String, Vec<String>>,
    /// Captured environment-dependent values.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Recording {
    /// Creates an empty recording for a session.
    #[must_use]
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            ..Self::default()
        }
    }

    /// Appends an exchange, sanitizing both bodies.
    pub fn push(&mut self, request: &HttpRequest, response: &HttpResponse) {
        let sequence = u64::try_from(self.entries.len()).unwrap_or(u64::MAX).saturating_add(1);
        self.entries.push(RecordedExchange {
            sequence,
            method: request.method,
            uri: request.path_and_query(),
            request_body: request.body.as_ref().map(sanitize),
            status: response.status,
            response_body: response.body.as_ref().map(sanitize).map(relativize_next_link),
        });
    }

    /// Loads a recording from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when the file cannot be read or decoded,
    /// and [`TransportError::Limit`] when it exceeds [`MAX_RECORDING_BYTES`].
    pub fn load(path: &Path) -> Result<Self, TransportError> {
        Self::load_with_limit(path, MAX_RECORDING_BYTES)
    }

    /// Loads a recording, reading at most `max_bytes` from the file.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when the file cannot be read or decoded,
    /// and [`TransportError::Limit`] when it exceeds `max_bytes`.
    pub fn load_with_limit(path: &Path, max_bytes: usize) -> Result<Self, TransportError> {
        let file = File::open(path).map_err(|err| {
            TransportError::Io(format!("failed to open recording {}: {err}", path.display()))
        })?;
        let limit = u64::try_from(max_bytes)
            .map_err(|_| TransportError::Limit("recording size limit exceeds u64".to_string()))?;
        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(|err| {
            TransportError::Io(format!("failed to read recording {}: {err}", path.display()))
        })?;
        if bytes.len() > max_bytes {
            return Err(TransportError::Limit(format!(
                "recording {} exceeds size limit",
                path.display()
            )));
        }
        serde_json::from_slice(&bytes).map_err(|err| {
            TransportError::Io(format!("invalid recording {}: {err}", path.display()))
        })
    }

    /// Writes the recording as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), TransportError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                TransportError::Io(format!("failed to create {}: {err}", parent.display()))
            })?;
        }
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|err| TransportError::Io(format!("failed to encode recording: {err}")))?;
        fs::write(path, bytes).map_err(|err| {
            TransportError::Io(format!("failed to write recording {}: {err}", path.display()))
        })?;
        debug!(path = %path.display(), entries = self.entries.len(), "recording saved");
        Ok(())
    }
}

/// Replaces every `password` member (any nesting depth) with [`SANITIZED`].
#[must_use]
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    let item = if key.eq_ignore_ascii_case("password") {
                        Value::String(SANITIZED.to_string())
                    } else {
                        sanitize(item)
                    };
                    (key.clone(), item)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}

/// Rewrites an absolute top-level `nextLink` to its path and query.
fn relativize_next_link(mut body: Value) -> Value {
    if let Some(link) = body.get_mut("nextLink")
        && let Some(absolute) = link.as_str().and_then(|raw| Url::parse(raw).ok())
    {
        *link = Value::String(path_and_query(&absolute));
    }
    body
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Transport wrapper that records every completed exchange.
#[derive(Clone)]
pub struct RecordingTransport {
    /// Transport that performs the request.
    inner: Arc<dyn Transport>,
    /// Shared recording sink.
    recording: Arc<Mutex<Recording>>,
}

impl RecordingTransport {
    /// Wraps `inner`, appending exchanges to `recording`.
    #[must_use]
    pub fn new(inner: Arc<dyn Transport>, recording: Arc<Mutex<Recording>>) -> Self {
        Self {
            inner,
            recording,
        }
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.inner.send(request)?;
        let mut guard = self
            .recording
            .lock()
            .map_err(|_| TransportError::Lock("recording mutex poisoned".to_string()))?;
        guard.push(request, &response);
        Ok(response)
    }
}
