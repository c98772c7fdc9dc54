// crates/lake-catalog-client/src/request.rs
// ============================================================================
// Module: Request Execution
// Description: Shared send, status mapping, and decoding for API clients.
// Purpose: Keep logging and error mapping identical across API surfaces.
// Dependencies: serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! Both clients send through [`execute`], which logs each round trip at
//! `debug` and turns non-2xx responses into [`ClientError`]s.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;
use crate::transport::HttpRequest;
use crate::transport::Transport;

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Sends a request and returns the body of a successful response.
pub(crate) fn execute(
    transport: &dyn Transport,
    request: &HttpRequest,
) -> Result<Option<Value>, ClientError> {
    let response = transport.send(request)?;
    debug!(
        method = %request.method,
        path = request.url.path(),
        status = response.status,
        "api request completed"
    );
    if !response.is_success() {
        return Err(ClientError::from_status(response.status, response.body.as_ref()));
    }
    Ok(response.body)
}

/// Decodes a required response body.
pub(crate) fn decode<T: DeserializeOwned>(body: Option<Value>) -> Result<T, ClientError> {
    let body = body.ok_or_else(|| ClientError::Decode("response body is empty".to_string()))?;
    decode_value(body)
}

/// Decodes a JSON value.
pub(crate) fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|err| ClientError::Decode(err.to_string()))
}
