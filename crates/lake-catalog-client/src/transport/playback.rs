// crates/lake-catalog-client/src/transport/playback.rs
// ============================================================================
// Module: Playback Transport
// Description: Transport that answers requests from a saved recording.
// Purpose: Run scenarios offline and deterministically.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Exchanges are grouped by method plus path-and-query (the host is ignored)
//! and served first-in first-out within each group, so repeated polls of the
//! same URL replay in recorded order.
//! Invariants:
//! - Each recorded exchange is served at most once.
//! - A request with no remaining match fails; it is never answered with a guess.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::HttpRequest;
use super::HttpResponse;
use super::Method;
use super::Transport;
use super::recording::RecordedExchange;
use super::recording::Recording;
use crate::error::TransportError;

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Match key for recorded exchanges.
type ExchangeKey = (Method, String);

/// Transport that serves responses from a [`Recording`].
pub struct PlaybackTransport {
    /// Remaining exchanges per request key.
    queues: Mutex<BTreeMap<ExchangeKey, VecDeque<RecordedExchange>>>,
}

impl PlaybackTransport {
    /// Builds a playback transport over a recording's exchanges.
    #[must_use]
    pub fn new(recording: &Recording) -> Self {
        let mut queues: BTreeMap<ExchangeKey, VecDeque<RecordedExchange>> = BTreeMap::new();
        for entry in &recording.entries {
            queues.entry((entry.method, entry.uri.clone())).or_default().push_back(entry.clone());
        }
        Self {
            queues: Mutex::new(queues),
        }
    }

    /// Returns the number of exchanges not yet served.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Lock`] when the queue lock is poisoned.
    pub fn remaining(&self) -> Result<usize, TransportError> {
        let guard = self
            .queues
            .lock()
            .map_err(|_| TransportError::Lock("playback mutex poisoned".to_string()))?;
        Ok(guard.values().map(VecDeque::len).sum())
    }
}

impl Transport for PlaybackTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let uri = request.path_and_query();
        let mut guard = self
            .queues
            .lock()
            .map_err(|_| TransportError::Lock("playback mutex poisoned".to_string()))?;
        let exchange = guard
            .get_mut(&(request.method, uri.clone()))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                TransportError::Playback(format!(
                    "no recorded response for {} {uri}",
                    request.method
                ))
            })?;
        Ok(HttpResponse {
            status: exchange.status,
            body: exchange.response_body,
        })
    }
}
