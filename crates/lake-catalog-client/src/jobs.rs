// crates/lake-catalog-client/src/jobs.rs
// ============================================================================
// Module: Job Client
// Description: Submit, inspect, and await catalog script jobs.
// Purpose: Run catalog-mutating scripts to completion with bounded polling.
// Dependencies: lake-catalog-core, tracing
// ============================================================================

//! ## Overview
//! Catalog objects are created and dropped by scripts that run as jobs.
//! [`JobClient::run_to_completion`] submits a script and polls until the job
//! reaches a terminal state, sleeping on a linear schedule capped at
//! [`PollPolicy::max_interval`]. Polling is the only point where a call blocks
//! without I/O.
//! Invariants:
//! - At most `max_attempts` polls follow the submission.
//! - A zero delay never sleeps.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lake_catalog_core::AccountScope;
use lake_catalog_core::JobId;
use lake_catalog_core::JobInformation;
use lake_catalog_core::JobResult;
use lake_catalog_core::JobSubmission;
use tracing::debug;
use tracing::info;

use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::request::decode;
use crate::request::execute;
use crate::transport::HttpRequest;
use crate::transport::Method;
use crate::transport::Transport;

// ============================================================================
// SECTION: Poll Policy
// ============================================================================

/// Job polling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before the first poll; grows by this much per poll.
    pub interval: Duration,
    /// Upper bound on any single delay.
    pub max_interval: Duration,
    /// Maximum polls after submission.
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Policy that polls without sleeping.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            interval: Duration::ZERO,
            max_interval: Duration::ZERO,
            max_attempts,
        }
    }

    /// Returns the delay before poll number `attempt` (1-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.interval.saturating_mul(attempt).min(self.max_interval)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(10),
            max_attempts: 600,
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Typed client for the job surface.
#[derive(Clone)]
pub struct JobClient {
    /// Transport used for every request.
    transport: Arc<dyn Transport>,
    /// Job endpoint template and api-version.
    endpoint: Endpoint,
}

impl JobClient {
    /// Creates a job client.
    #[must_use]
    pub const fn new(transport: Arc<dyn Transport>, endpoint: Endpoint) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    /// Submits a job under a caller-chosen identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Conflict`] when the identifier is already used.
    pub fn submit_job(
        &self,
        account: &AccountScope,
        job_id: &JobId,
        submission: &JobSubmission,
    ) -> Result<JobInformation, ClientError> {
        let url = self.endpoint.url(account.account(), &["Jobs", job_id.as_str()], &[])?;
        let body = serde_json::to_value(submission.to_wire())
            .map_err(|err| ClientError::InvalidRequest(format!("job encoding failed: {err}")))?;
        let request = HttpRequest::new(Method::Put, url).with_body(body);
        let info: JobInformation = decode(execute(self.transport.as_ref(), &request)?)?;
        debug!(job_id = %job_id, name = %submission.name, state = %info.state, "job submitted");
        Ok(info)
    }

    /// Gets the current job status.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the job does not exist.
    pub fn get_job(
        &self,
        account: &AccountScope,
        job_id: &JobId,
    ) -> Result<JobInformation, ClientError> {
        let url = self.endpoint.url(account.account(), &["Jobs", job_id.as_str()], &[])?;
        decode(execute(self.transport.as_ref(), &HttpRequest::new(Method::Get, url))?)
    }

    /// Submits a job and polls until it ends.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::JobFailed`] when the job ends without success,
    /// [`ClientError::JobTimeout`] when the poll budget runs out, and any
    /// request error from submission or polling.
    pub fn run_to_completion(
        &self,
        account: &AccountScope,
        job_id: &JobId,
        submission: &JobSubmission,
        policy: &PollPolicy,
    ) -> Result<JobInformation, ClientError> {
        let mut info = self.submit_job(account, job_id, submission)?;
        let mut attempts = 0_u32;
        while !info.state.is_terminal() {
            if attempts >= policy.max_attempts {
                return Err(ClientError::JobTimeout {
                    job_id: job_id.clone(),
                    attempts,
                });
            }
            attempts += 1;
            let delay = policy.delay_for_attempt(attempts);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            info = self.get_job(account, job_id)?;
        }
        info!(job_id = %job_id, result = %info.result, polls = attempts, "job ended");
        if info.result != JobResult::Succeeded {
            return Err(ClientError::JobFailed {
                job_id: job_id.clone(),
                result: info.result,
                messages: info.messages(),
            });
        }
        Ok(info)
    }
}
