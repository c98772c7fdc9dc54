// crates/lake-catalog-client/src/error.rs
// ============================================================================
// Module: Client Errors
// Description: Typed failures for catalog and job operations.
// Purpose: Map HTTP status codes and transport faults to stable error kinds.
// Dependencies: lake-catalog-core, serde, thiserror
// ============================================================================

//! ## Overview
//! Every non-2xx response becomes a [`ClientError`] carrying the HTTP status
//! and the service's error message. Transport faults (network, playback miss,
//! size limits) are kept distinct from service rejections.
//! Invariants:
//! - 404 maps to [`ClientError::NotFound`], 409 to [`ClientError::Conflict`].
//! - No variant carries secret material.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use lake_catalog_core::IdentifierError;
use lake_catalog_core::JobId;
use lake_catalog_core::JobResult;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Errors raised below the HTTP status layer.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request could not be sent or the response could not be read.
    #[error("http transport error: {0}")]
    Http(String),
    /// Local I/O failed (recording files).
    #[error("transport io error: {0}")]
    Io(String),
    /// Playback had no recorded exchange for the request.
    #[error("playback error: {0}")]
    Playback(String),
    /// Response exceeded a configured limit.
    #[error("transport limit exceeded: {0}")]
    Limit(String),
    /// Shared recording state was poisoned.
    #[error("transport lock poisoned: {0}")]
    Lock(String),
}

// ============================================================================
// SECTION: Service Failures
// ============================================================================

/// Service-reported failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    /// HTTP status code.
    pub status: u16,
    /// Service error code, when present.
    pub code: Option<String>,
    /// Service error message, or a generic description.
    pub message: String,
}

impl ServiceFailure {
    /// Builds failure details from a status and an optional error body.
    #[must_use]
    pub fn from_response(status: u16, body: Option<&Value>) -> Self {
        let envelope = body.and_then(|body| CloudError::deserialize(body).ok());
        let (code, message) = envelope
            .and_then(|envelope| envelope.error)
            .map_or((None, None), |detail| (detail.code, detail.message));
        let message = message
            .or_else(|| body.and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self {
            status,
            code,
            message,
        }
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} {}: {}", self.status, code, self.message),
            None => write!(f, "{}: {}", self.status, self.message),
        }
    }
}

/// Service error envelope: `{"error": {"code", "message"}}`.
#[derive(Debug, Deserialize)]
struct CloudError {
    /// Error detail object.
    #[serde(default)]
    error: Option<CloudErrorBody>,
}

/// Service error detail.
#[derive(Debug, Deserialize)]
struct CloudErrorBody {
    /// Machine-readable error code.
    #[serde(default)]
    code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Errors returned by catalog and job client operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Resource does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(ServiceFailure),
    /// Request conflicts with current state (HTTP 409).
    #[error("conflict: {0}")]
    Conflict(ServiceFailure),
    /// Any other non-success status.
    #[error("service error: {0}")]
    Service(ServiceFailure),
    /// Transport-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// Request could not be built from the inputs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// List pagination exceeded the configured page cap.
    #[error("list exceeded {limit} pages")]
    PageLimit {
        /// Maximum pages allowed.
        limit: u32,
    },
    /// Job ended without succeeding.
    #[error("job {job_id} ended with result {result}: {}", messages.join("; "))]
    JobFailed {
        /// Job identifier.
        job_id: JobId,
        /// Final job result.
        result: JobResult,
        /// Service error messages attached to the job.
        messages: Vec<String>,
    },
    /// Job did not reach a terminal state within the poll budget.
    #[error("job {job_id} did not finish after {attempts} polls")]
    JobTimeout {
        /// Job identifier.
        job_id: JobId,
        /// Number of polls issued.
        attempts: u32,
    },
}

impl ClientError {
    /// Maps a non-success response to the matching error kind.
    #[must_use]
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let failure = ServiceFailure::from_response(status, body);
        match status {
            404 => Self::NotFound(failure),
            409 => Self::Conflict(failure),
            _ => Self::Service(failure),
        }
    }

    /// Returns the HTTP status for service-reported errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(failure) | Self::Conflict(failure) | Self::Service(failure) => {
                Some(failure.status)
            }
            _ => None,
        }
    }

    /// Returns true for [`ClientError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true for [`ClientError::Conflict`].
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<IdentifierError> for ClientError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
