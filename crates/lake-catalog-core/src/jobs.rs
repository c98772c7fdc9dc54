// crates/lake-catalog-core/src/jobs.rs
// ============================================================================
// Module: Job Models
// Description: Submission payloads and status snapshots for analytics jobs.
// Purpose: Map catalog-mutating script jobs to and from the job service wire form.
// Dependencies: serde, time, crate::identifiers
// ============================================================================

//! ## Overview
//! Catalog objects are provisioned by submitting a script as a job and waiting
//! for it to reach a terminal state. [`JobSubmission`] is the request payload;
//! [`JobInformation`] is the status snapshot the service returns.
//! Invariants:
//! - [`JobState::is_terminal`] is true only for [`JobState::Ended`].
//! - The wire job type is always `USql`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::identifiers::JobId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Wire job type for catalog scripts.
pub const SCRIPT_JOB_TYPE: &str = "USql";
/// Default degree of parallelism for submitted jobs.
pub const DEFAULT_DEGREE_OF_PARALLELISM: u32 = 1;
/// Default priority for submitted jobs.
pub const DEFAULT_PRIORITY: u32 = 1000;

// ============================================================================
// SECTION: Submission
// ============================================================================

/// Job submission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission {
    /// Friendly job name.
    pub name: String,
    /// Script text executed by the job.
    pub script: String,
    /// Requested degree of parallelism.
    pub degree_of_parallelism: u32,
    /// Requested priority; lower runs sooner.
    pub priority: u32,
}

impl JobSubmission {
    /// Creates a submission with default parallelism and priority.
    #[must_use]
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            degree_of_parallelism: DEFAULT_DEGREE_OF_PARALLELISM,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Returns the service wire form of the submission.
    #[must_use]
    pub fn to_wire(&self) -> JobSubmissionWire {
        JobSubmissionWire {
            job_type: SCRIPT_JOB_TYPE.to_string(),
            name: self.name.clone(),
            degree_of_parallelism: self.degree_of_parallelism,
            priority: self.priority,
            properties: JobProperties {
                job_type: SCRIPT_JOB_TYPE.to_string(),
                script: self.script.clone(),
            },
        }
    }
}

/// Wire form of a job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSubmissionWire {
    /// Job type discriminator.
    #[serde(rename = "type")]
    pub job_type: String,
    /// Friendly job name.
    pub name: String,
    /// Requested degree of parallelism.
    pub degree_of_parallelism: u32,
    /// Requested priority.
    pub priority: u32,
    /// Script properties.
    pub properties: JobProperties,
}

impl From<JobSubmissionWire> for JobSubmission {
    fn from(wire: JobSubmissionWire) -> Self {
        Self {
            name: wire.name,
            script: wire.properties.script,
            degree_of_parallelism: wire.degree_of_parallelism,
            priority: wire.priority,
        }
    }
}

/// Script properties of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProperties {
    /// Job type discriminator.
    #[serde(rename = "type")]
    pub job_type: String,
    /// Script text.
    pub script: String,
}

// ============================================================================
// SECTION: Status
// ============================================================================

/// Job lifecycle state reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    /// Accepted for processing.
    Accepted,
    /// Script compilation in progress.
    Compiling,
    /// Finished; consult [`JobResult`].
    Ended,
    /// Newly created.
    New,
    /// Waiting in the queue.
    Queued,
    /// Executing.
    Running,
    /// Being scheduled.
    Scheduling,
    /// Starting execution.
    Starting,
    /// Paused.
    Paused,
    /// Waiting for capacity.
    WaitingForCapacity,
    /// Yielded to other work.
    Yielded,
    /// Finalizing outputs.
    Finalizing,
}

impl JobState {
    /// Returns true when the job will not change state again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended)
    }

    /// Returns the wire label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Compiling => "Compiling",
            Self::Ended => "Ended",
            Self::New => "New",
            Self::Queued => "Queued",
            Self::Running => "Running",
            Self::Scheduling => "Scheduling",
            Self::Starting => "Starting",
            Self::Paused => "Paused",
            Self::WaitingForCapacity => "WaitingForCapacity",
            Self::Yielded => "Yielded",
            Self::Finalizing => "Finalizing",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final job outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobResult {
    /// No outcome yet.
    #[default]
    None,
    /// Completed successfully.
    Succeeded,
    /// Cancelled before completion.
    Cancelled,
    /// Failed.
    Failed,
}

impl JobResult {
    /// Returns the wire label for the result.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Succeeded => "Succeeded",
            Self::Cancelled => "Cancelled",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error detail attached to a failed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobErrorDetail {
    /// Service error identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
    /// Human-readable message.
    pub message: String,
}

/// Job status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInformation {
    /// Job identifier.
    pub job_id: JobId,
    /// Friendly job name.
    #[serde(default)]
    pub name: String,
    /// Current lifecycle state.
    pub state: JobState,
    /// Outcome once the job has ended.
    #[serde(default)]
    pub result: JobResult,
    /// Error details for failed jobs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_message: Vec<JobErrorDetail>,
    /// Submission timestamp.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub submit_time: Option<OffsetDateTime>,
    /// Completion timestamp.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<OffsetDateTime>,
}

impl JobInformation {
    /// Returns the error messages attached to the job.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.error_message.iter().map(|detail| detail.message.clone()).collect()
    }
}
