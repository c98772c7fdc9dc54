// crates/lake-catalog-client/src/mock.rs
// ============================================================================
// Module: Mock Context
// Description: Session-scoped transport selection for live, record, and playback runs.
// Purpose: Give scenarios one handle for their transport, names, and recording file.
// Dependencies: tracing, uuid, crate::transport
// ============================================================================

//! ## Overview
//! A [`MockContext`] owns one test session. In [`MockMode::Record`] it wraps
//! the live transport in a recorder and persists `{dir}/{session}.json` when
//! the session ends; in [`MockMode::Playback`] it loads that file and serves
//! every request, generated name, and captured variable from it.
//! Invariants:
//! - Record mode persists on drop as well as on [`MockContext::finish`], so a
//!   failing scenario still leaves its recording behind.
//! - Playback never calls the live connector.
//! - Generated names replay in the order they were recorded, per prefix.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use lake_catalog_core::validate_segment;
use tracing::debug;
use tracing::warn;
use uuid::Uuid;

use crate::error::TransportError;
use crate::jobs::PollPolicy;
use crate::transport::Transport;
use crate::transport::playback::PlaybackTransport;
use crate::transport::recording::Recording;
use crate::transport::recording::RecordingTransport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name-map key used for bare UUIDs.
const ID_KEY: &str = "id";

// ============================================================================
// SECTION: Mode
// ============================================================================

/// Transport mode for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockMode {
    /// Talk to the live endpoint; record nothing.
    Live,
    /// Talk to the live endpoint and persist a recording.
    Record,
    /// Serve everything from a saved recording.
    Playback,
}

impl MockMode {
    /// Returns a stable label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Record => "record",
            Self::Playback => "playback",
        }
    }
}

impl fmt::Display for MockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Session-scoped transport and name source.
pub struct MockContext {
    /// Session mode.
    mode: MockMode,
    /// Recording file path.
    path: PathBuf,
    /// Recording being written (record) or replayed (playback).
    recording: Arc<Mutex<Recording>>,
    /// Transport handed to clients.
    transport: Arc<dyn Transport>,
    /// Names still to be replayed, per prefix (playback only).
    replay: Mutex<BTreeMap<String, VecDeque<String>>>,
    /// Set once the recording has been persisted.
    finished: bool,
}

impl MockContext {
    /// Starts a session.
    ///
    /// `connect` builds the live transport; it is not called in playback mode.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the session name is invalid, the live
    /// transport cannot be built, or the playback recording cannot be loaded.
    pub fn start<F>(
        dir: &Path,
        session: &str,
        mode: MockMode,
        connect: F,
    ) -> Result<Self, TransportError>
    where
        F: FnOnce() -> Result<Arc<dyn Transport>, TransportError>,
    {
        validate_segment("session", session)
            .map_err(|err| TransportError::Io(format!("invalid session name: {err}")))?;
        let path = dir.join(format!("{session}.json"));
        let (recording, transport, replay) = match mode {
            MockMode::Live => {
                (Arc::new(Mutex::new(Recording::new(session))), connect()?, BTreeMap::new())
            }
            MockMode::Record => {
                let recording = Arc::new(Mutex::new(Recording::new(session)));
                let transport: Arc<dyn Transport> =
                    Arc::new(RecordingTransport::new(connect()?, Arc::clone(&recording)));
                (recording, transport, BTreeMap::new())
            }
            MockMode::Playback => {
                let loaded = Recording::load(&path)?;
                let transport: Arc<dyn Transport> = Arc::new(PlaybackTransport::new(&loaded));
                let replay = loaded
                    .names
                    .iter()
                    .map(|(prefix, names)| (prefix.clone(), names.iter().cloned().collect()))
                    .collect();
                (Arc::new(Mutex::new(loaded)), transport, replay)
            }
        };
        debug!(session, mode = %mode, path = %path.display(), "mock context started");
        Ok(Self {
            mode,
            path,
            recording,
            transport,
            replay: Mutex::new(replay),
            finished: false,
        })
    }

    /// Returns the session mode.
    #[must_use]
    pub const fn mode(&self) -> MockMode {
        self.mode
    }

    /// Returns the recording file path.
    #[must_use]
    pub fn recording_path(&self) -> &Path {
        &self.path
    }

    /// Returns the transport for clients in this session.
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Returns a snapshot of the session recording.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Lock`] when the recording lock is poisoned.
    pub fn recording(&self) -> Result<Recording, TransportError> {
        self.recording
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| TransportError::Lock("recording mutex poisoned".to_string()))
    }

    /// Returns a fresh name such as `db1a2b3c4d`, replayed in playback mode.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Playback`] when the recording has no more
    /// names for `prefix`, or [`TransportError::Lock`] on a poisoned lock.
    pub fn generate_name(&self, prefix: &str) -> Result<String, TransportError> {
        self.generated(prefix, || {
            let id = Uuid::new_v4().simple().to_string();
            format!("{prefix}{}", &id[.. 10])
        })
    }

    /// Returns a fresh UUID string, replayed in playback mode.
    ///
    /// # Errors
    ///
    /// Same as [`MockContext::generate_name`].
    pub fn generate_id(&self) -> Result<String, TransportError> {
        self.generated(ID_KEY, || Uuid::new_v4().to_string())
    }

    /// Returns an environment-dependent value, captured when recording.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Playback`] when the recording lacks `key`, or
    /// [`TransportError::Lock`] on a poisoned lock.
    pub fn variable<F>(&self, key: &str, live_value: F) -> Result<String, TransportError>
    where
        F: FnOnce() -> String,
    {
        let mut guard = self
            .recording
            .lock()
            .map_err(|_| TransportError::Lock("recording mutex poisoned".to_string()))?;
        if self.mode == MockMode::Playback {
            return guard.variables.get(key).cloned().ok_or_else(|| {
                TransportError::Playback(format!("recording has no variable {key}"))
            });
        }
        let value = live_value();
        guard.variables.insert(key.to_string(), value.clone());
        Ok(value)
    }

    /// Adapts a poll policy to the mode; playback never sleeps.
    #[must_use]
    pub const fn poll_policy(&self, base: PollPolicy) -> PollPolicy {
        match self.mode {
            MockMode::Playback => PollPolicy {
                interval: Duration::ZERO,
                max_interval: Duration::ZERO,
                max_attempts: base.max_attempts,
            },
            MockMode::Live | MockMode::Record => base,
        }
    }

    /// Ends the session, persisting the recording in record mode.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the recording cannot be written.
    pub fn finish(mut self) -> Result<(), TransportError> {
        self.finished = true;
        self.persist()
    }

    /// Produces or replays a generated value under `key`.
    fn generated<F>(&self, key: &str, make: F) -> Result<String, TransportError>
    where
        F: FnOnce() -> String,
    {
        if self.mode == MockMode::Playback {
            let mut replay = self
                .replay
                .lock()
                .map_err(|_| TransportError::Lock("replay mutex poisoned".to_string()))?;
            return replay.get_mut(key).and_then(VecDeque::pop_front).ok_or_else(|| {
                TransportError::Playback(format!("recording has no more generated names for {key}"))
            });
        }
        let value = make();
        let mut guard = self
            .recording
            .lock()
            .map_err(|_| TransportError::Lock("recording mutex poisoned".to_string()))?;
        guard.names.entry(key.to_string()).or_default().push(value.clone());
        Ok(value)
    }

    /// Writes the recording file in record mode.
    fn persist(&self) -> Result<(), TransportError> {
        if self.mode != MockMode::Record {
            return Ok(());
        }
        let snapshot = self.recording()?;
        snapshot.save(&self.path)
    }
}

impl Drop for MockContext {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Err(err) = self.persist() {
            warn!(path = %self.path.display(), error = %err, "failed to persist recording");
        }
    }
}
