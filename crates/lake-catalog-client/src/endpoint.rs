// crates/lake-catalog-client/src/endpoint.rs
// ============================================================================
// Module: Endpoint Resolution
// Description: Account-templated base URLs and request URL construction.
// Purpose: Turn (account, path segments, query) into a fully resolved URL.
// Dependencies: url, lake-catalog-core
// ============================================================================

//! ## Overview
//! An endpoint is a base URL template containing `{accountName}` plus the
//! `api-version` the surface expects. Path segments are appended through the
//! URL path API, so every segment is percent-encoded.
//! Invariants:
//! - Every resolved URL carries exactly one `api-version` pair, first.
//! - Pagination links are only followed within the endpoint's origin.

// ============================================================================
// SECTION: Imports
// ============================================================================

use lake_catalog_core::AccountName;
use url::Url;

use crate::error::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder replaced by the account name.
pub const ACCOUNT_PLACEHOLDER: &str = "{accountName}";
/// Default public endpoint template for both surfaces.
pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "https://{accountName}.azuredatalakeanalytics.net";
/// Catalog surface api-version.
pub const CATALOG_API_VERSION: &str = "2016-11-01";
/// Job surface api-version.
pub const JOBS_API_VERSION: &str = "2017-09-01-preview";

// ============================================================================
// SECTION: Endpoint
// ============================================================================

/// Base URL template plus api-version for one API surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Base URL template containing [`ACCOUNT_PLACEHOLDER`].
    template: String,
    /// Value of the `api-version` query parameter.
    api_version: String,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(template: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            api_version: api_version.into(),
        }
    }

    /// Default catalog endpoint.
    #[must_use]
    pub fn catalog_default() -> Self {
        Self::new(DEFAULT_ENDPOINT_TEMPLATE, CATALOG_API_VERSION)
    }

    /// Default job endpoint.
    #[must_use]
    pub fn jobs_default() -> Self {
        Self::new(DEFAULT_ENDPOINT_TEMPLATE, JOBS_API_VERSION)
    }

    /// Returns the template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the api-version.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Resolves the base URL for an account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when the substituted template is
    /// not an absolute hierarchical URL.
    pub fn base_url(&self, account: &AccountName) -> Result<Url, ClientError> {
        let resolved = self.template.replace(ACCOUNT_PLACEHOLDER, account.as_str());
        let url = Url::parse(&resolved).map_err(|err| {
            ClientError::InvalidRequest(format!("invalid endpoint {resolved}: {err}"))
        })?;
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidRequest(format!(
                "endpoint {resolved} cannot be a base url"
            )));
        }
        Ok(url)
    }

    /// Builds a request URL from path segments and extra query pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when the base URL is invalid.
    pub fn url(
        &self,
        account: &AccountName,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Url, ClientError> {
        let mut url = self.base_url(account)?;
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidRequest("endpoint cannot be a base url".to_string()))?
            .pop_if_empty()
            .extend(segments);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api-version", &self.api_version);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Validates a server-provided pagination link.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] when the link does not parse or
    /// points outside the endpoint's origin.
    pub fn next_link(&self, account: &AccountName, link: &str) -> Result<Url, ClientError> {
        let base = self.base_url(account)?;
        let next = Url::parse(link)
            .or_else(|_| base.join(link))
            .map_err(|err| ClientError::InvalidRequest(format!("invalid nextLink: {err}")))?;
        if next.origin() != base.origin() {
            return Err(ClientError::InvalidRequest(
                "nextLink points outside the endpoint origin".to_string(),
            ));
        }
        Ok(next)
    }
}
