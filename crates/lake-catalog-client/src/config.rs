// crates/lake-catalog-client/src/config.rs
// ============================================================================
// Module: Client Configuration
// Description: TOML configuration for endpoints, HTTP limits, and job polling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file named explicitly or through
//! `LAKE_CATALOG_CONFIG`. Every section is optional and defaults to the public
//! service endpoints. The bearer token is never stored in the file; the
//! `[auth]` section names the environment variable that holds it.
//! Invariants:
//! - A loaded configuration has passed [`ClientConfig::validate`].
//! - Unknown keys are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::catalog::CatalogClient;
use crate::endpoint::ACCOUNT_PLACEHOLDER;
use crate::endpoint::CATALOG_API_VERSION;
use crate::endpoint::DEFAULT_ENDPOINT_TEMPLATE;
use crate::endpoint::Endpoint;
use crate::endpoint::JOBS_API_VERSION;
use crate::jobs::PollPolicy;
use crate::transport::Transport;
use crate::transport::http::HttpTransportConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable used to locate the config file.
pub const CONFIG_ENV_VAR: &str = "LAKE_CATALOG_CONFIG";
/// Default environment variable holding the bearer token.
pub const DEFAULT_TOKEN_ENV: &str = "LAKE_CATALOG_TOKEN";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 256 * 1024;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum request timeout in milliseconds.
const MAX_TIMEOUT_MS: u64 = 600_000;
/// Maximum response body limit in bytes.
const MAX_RESPONSE_BYTES_LIMIT: usize = 256 * 1024 * 1024;
/// Maximum number of poll attempts.
const MAX_POLL_ATTEMPTS_LIMIT: u32 = 100_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Endpoint templates and api-versions.
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// HTTP transport limits.
    #[serde(default)]
    pub http: HttpConfig,
    /// Job polling policy.
    #[serde(default)]
    pub jobs: JobsConfig,
    /// Authentication source.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// `[endpoint]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Catalog base URL template.
    #[serde(default = "default_endpoint_template")]
    pub catalog: String,
    /// Job base URL template.
    #[serde(default = "default_endpoint_template")]
    pub jobs: String,
    /// Catalog api-version.
    #[serde(default = "default_catalog_api_version")]
    pub catalog_api_version: String,
    /// Job api-version.
    #[serde(default = "default_jobs_api_version")]
    pub jobs_api_version: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            catalog: default_endpoint_template(),
            jobs: default_endpoint_template(),
            catalog_api_version: default_catalog_api_version(),
            jobs_api_version: default_jobs_api_version(),
        }
    }
}

/// `[http]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Allow cleartext `http://` endpoints.
    #[serde(default)]
    pub allow_http: bool,
    /// Maximum pages followed by one list call.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            max_response_bytes: default_max_response_bytes(),
            allow_http: false,
            max_pages: default_max_pages(),
        }
    }
}

/// `[jobs]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobsConfig {
    /// Initial poll interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Poll interval cap in milliseconds.
    #[serde(default = "default_max_poll_interval_ms")]
    pub max_poll_interval_ms: u64,
    /// Maximum polls before giving up.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_interval_ms: default_max_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

/// `[auth]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
        }
    }
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

impl ClientConfig {
    /// Loads configuration from `path`, or from `LAKE_CATALOG_CONFIG`, or
    /// returns validated defaults when neither is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is too large, is
    /// not UTF-8 TOML, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(resolved) = resolve_path(path)? else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        let file = File::open(&resolved).map_err(|err| {
            ConfigError::Io(format!("failed to open {}: {err}", resolved.display()))
        })?;
        let limit = u64::try_from(MAX_CONFIG_FILE_SIZE)
            .map_err(|_| ConfigError::Invalid("config size limit exceeds u64".to_string()))?;
        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(|err| {
            ConfigError::Io(format!("failed to read {}: {err}", resolved.display()))
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for TOML errors and
    /// [`ConfigError::Invalid`] for validation failures.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_template("endpoint.catalog", &self.endpoint.catalog, self.http.allow_http)?;
        validate_template("endpoint.jobs", &self.endpoint.jobs, self.http.allow_http)?;
        validate_non_empty("endpoint.catalog_api_version", &self.endpoint.catalog_api_version)?;
        validate_non_empty("endpoint.jobs_api_version", &self.endpoint.jobs_api_version)?;
        if self.http.timeout_ms == 0 || self.http.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "http.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        validate_non_empty("http.user_agent", &self.http.user_agent)?;
        if self.http.max_response_bytes == 0
            || self.http.max_response_bytes > MAX_RESPONSE_BYTES_LIMIT
        {
            return Err(ConfigError::Invalid(format!(
                "http.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES_LIMIT}"
            )));
        }
        if self.http.max_pages == 0 {
            return Err(ConfigError::Invalid("http.max_pages must be at least 1".to_string()));
        }
        if self.jobs.poll_interval_ms > self.jobs.max_poll_interval_ms {
            return Err(ConfigError::Invalid(
                "jobs.poll_interval_ms must not exceed jobs.max_poll_interval_ms".to_string(),
            ));
        }
        if self.jobs.max_poll_attempts == 0 || self.jobs.max_poll_attempts > MAX_POLL_ATTEMPTS_LIMIT
        {
            return Err(ConfigError::Invalid(format!(
                "jobs.max_poll_attempts must be between 1 and {MAX_POLL_ATTEMPTS_LIMIT}"
            )));
        }
        validate_non_empty("auth.token_env", &self.auth.token_env)?;
        Ok(())
    }

    /// Returns the catalog endpoint.
    #[must_use]
    pub fn catalog_endpoint(&self) -> Endpoint {
        Endpoint::new(&self.endpoint.catalog, &self.endpoint.catalog_api_version)
    }

    /// Returns the job endpoint.
    #[must_use]
    pub fn jobs_endpoint(&self) -> Endpoint {
        Endpoint::new(&self.endpoint.jobs, &self.endpoint.jobs_api_version)
    }

    /// Builds a catalog client over `transport` with the configured page cap.
    #[must_use]
    pub fn catalog_client(&self, transport: Arc<dyn Transport>) -> CatalogClient {
        CatalogClient::new(transport, self.catalog_endpoint()).with_max_pages(self.http.max_pages)
    }

    /// Reads the bearer token from the configured environment variable.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        env::var(&self.auth.token_env).ok().filter(|token| !token.trim().is_empty())
    }

    /// Returns HTTP transport settings, including the bearer token.
    #[must_use]
    pub fn http_transport(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            timeout: Duration::from_millis(self.http.timeout_ms),
            user_agent: self.http.user_agent.clone(),
            max_response_bytes: self.http.max_response_bytes,
            bearer_token: self.bearer_token(),
        }
    }

    /// Returns the job poll policy.
    #[must_use]
    pub const fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.jobs.poll_interval_ms),
            max_interval: Duration::from_millis(self.jobs.max_poll_interval_ms),
            max_attempts: self.jobs.max_poll_attempts,
        }
    }
}

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument or environment.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    let resolved = match path {
        Some(path) => path.to_path_buf(),
        None => match env::var(CONFIG_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
            _ => return Ok(None),
        },
    };
    if resolved.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    Ok(Some(resolved))
}

/// Validates an endpoint template by resolving it with a sample account.
fn validate_template(field: &str, template: &str, allow_http: bool) -> Result<(), ConfigError> {
    let sample = template.replace(ACCOUNT_PLACEHOLDER, "account");
    let url = Url::parse(&sample)
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url: {err}")))?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        "http" => {
            return Err(ConfigError::Invalid(format!(
                "{field} uses http; set http.allow_http to permit it"
            )));
        }
        other => {
            return Err(ConfigError::Invalid(format!("{field} has unsupported scheme {other}")));
        }
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(format!("{field} must not embed credentials")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid(format!("{field} must not carry a query or fragment")));
    }
    Ok(())
}

/// Rejects empty or whitespace-only values.
fn validate_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    Ok(())
}

/// Default endpoint template.
fn default_endpoint_template() -> String {
    DEFAULT_ENDPOINT_TEMPLATE.to_string()
}

/// Default catalog api-version.
fn default_catalog_api_version() -> String {
    CATALOG_API_VERSION.to_string()
}

/// Default job api-version.
fn default_jobs_api_version() -> String {
    JOBS_API_VERSION.to_string()
}

/// Default request timeout.
const fn default_timeout_ms() -> u64 {
    30_000
}

/// Default user agent.
fn default_user_agent() -> String {
    concat!("lake-catalog-client/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Default response size limit.
const fn default_max_response_bytes() -> usize {
    8 * 1024 * 1024
}

/// Default page cap for list calls.
const fn default_max_pages() -> u32 {
    1_000
}

/// Default initial poll interval.
const fn default_poll_interval_ms() -> u64 {
    1_000
}

/// Default poll interval cap.
const fn default_max_poll_interval_ms() -> u64 {
    10_000
}

/// Default poll attempt budget.
const fn default_max_poll_attempts() -> u32 {
    600
}

/// Default token environment variable.
fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}
