// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Account name used when no override is set.
pub const DEFAULT_ACCOUNT: &str = "testaccount";

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional run root override.
    RunRoot,
    /// Scenario mode (`stub`, `record`, `playback`, `live`).
    Mode,
    /// Optional recordings directory override.
    RecordingsDir,
    /// Optional client config file for record and live runs.
    ClientConfig,
    /// Optional account name override.
    Account,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "LAKE_CATALOG_TEST_RUN_ROOT",
            Self::Mode => "LAKE_CATALOG_TEST_MODE",
            Self::RecordingsDir => "LAKE_CATALOG_TEST_RECORDINGS_DIR",
            Self::ClientConfig => "LAKE_CATALOG_TEST_CLIENT_CONFIG",
            Self::Account => "LAKE_CATALOG_TEST_ACCOUNT",
            Self::TimeoutSeconds => "LAKE_CATALOG_TEST_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Mode
// ============================================================================

/// Where scenario requests go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestMode {
    /// In-process stub service; nothing is recorded.
    #[default]
    Stub,
    /// Record against the configured service, or the stub when none is set.
    Record,
    /// Replay saved recordings; no service is contacted.
    Playback,
    /// Live service from the client config; nothing is recorded.
    Live,
}

impl TestMode {
    /// Returns the canonical mode label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stub => "stub",
            Self::Record => "record",
            Self::Playback => "playback",
            Self::Live => "live",
        }
    }

    /// Parses a mode label (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error when the label is not a known mode.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        [Self::Stub, Self::Record, Self::Playback, Self::Live]
            .into_iter()
            .find(|mode| trimmed.eq_ignore_ascii_case(mode.as_str()))
            .ok_or_else(|| {
                format!(
                    "{} must be one of stub, record, playback, live",
                    SystemTestEnv::Mode.as_str()
                )
            })
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Scenario mode.
    pub mode: TestMode,
    /// Optional recordings directory override.
    pub recordings_dir: Option<PathBuf>,
    /// Optional client config file for record and live runs.
    pub client_config: Option<PathBuf>,
    /// Optional account name override.
    pub account: Option<String>,
    /// Optional timeout override in seconds (positive integer).
    pub timeout: Option<Duration>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an unknown mode or invalid timeout).
    pub fn load() -> Result<Self, String> {
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let mode = read_env_nonempty(SystemTestEnv::Mode.as_str())?
            .map(|value| TestMode::parse(&value))
            .transpose()?
            .unwrap_or_default();
        let recordings_dir =
            read_env_nonempty(SystemTestEnv::RecordingsDir.as_str())?.map(PathBuf::from);
        let client_config =
            read_env_nonempty(SystemTestEnv::ClientConfig.as_str())?.map(PathBuf::from);
        let account = read_env_nonempty(SystemTestEnv::Account.as_str())?;
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        if mode == TestMode::Live && client_config.is_none() {
            return Err(format!(
                "{} is required when {} is live",
                SystemTestEnv::ClientConfig.as_str(),
                SystemTestEnv::Mode.as_str()
            ));
        }
        Ok(Self {
            run_root,
            mode,
            recordings_dir,
            client_config,
            account,
            timeout,
        })
    }

    /// Returns the account name for scenarios.
    #[must_use]
    pub fn account_name(&self) -> &str {
        self.account.as_deref().unwrap_or(DEFAULT_ACCOUNT)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is missing, non-numeric, or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} must be a positive integer number of seconds"));
    }
    let secs: u64 = trimmed
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
