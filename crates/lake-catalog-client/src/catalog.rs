// crates/lake-catalog-client/src/catalog.rs
// ============================================================================
// Module: Catalog Client
// Description: Typed list/get/create/update/delete calls for catalog objects.
// Purpose: Expose one method per catalog resource operation over a transport.
// Dependencies: lake-catalog-core, serde, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`CatalogClient`] addresses objects through typed scopes and issues one
//! remote call per operation; nothing is cached. List calls follow `nextLink`
//! pages until exhausted or until `$top` items are collected, then re-apply the
//! filter locally so results satisfy the predicate even when the server
//! ignored it.
//! Invariants:
//! - Every returned list item matches the requested filter.
//! - A list never follows more than `max_pages` pages.
//! - Secret passwords are sent but never logged or returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use lake_catalog_core::AccountName;
use lake_catalog_core::AccountScope;
use lake_catalog_core::CatalogItem;
use lake_catalog_core::CatalogKind;
use lake_catalog_core::CatalogType;
use lake_catalog_core::Credential;
use lake_catalog_core::Database;
use lake_catalog_core::DatabaseScope;
use lake_catalog_core::ListOptions;
use lake_catalog_core::Procedure;
use lake_catalog_core::Schema;
use lake_catalog_core::SchemaScope;
use lake_catalog_core::Secret;
use lake_catalog_core::SecretParameters;
use lake_catalog_core::Table;
use lake_catalog_core::TableValuedFunction;
use lake_catalog_core::View;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::request::decode;
use crate::request::decode_value;
use crate::request::execute;
use crate::transport::HttpRequest;
use crate::transport::Method;
use crate::transport::Transport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default cap on pages followed by a single list call.
pub const DEFAULT_MAX_PAGES: u32 = 1_000;

/// Leading path segments of every catalog resource.
const CATALOG_ROOT: [&str; 3] = ["catalog", "usql", "databases"];

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// One page of a list response.
#[derive(Debug, Deserialize)]
struct Page {
    /// Items on this page.
    #[serde(default)]
    value: Vec<Value>,
    /// Link to the next page, when there is one.
    #[serde(default, rename = "nextLink")]
    next_link: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Typed client for the catalog surface.
#[derive(Clone)]
pub struct CatalogClient {
    /// Transport used for every request.
    transport: Arc<dyn Transport>,
    /// Catalog endpoint template and api-version.
    endpoint: Endpoint,
    /// Maximum pages followed per list call.
    max_pages: u32,
}

impl CatalogClient {
    /// Creates a catalog client.
    #[must_use]
    pub const fn new(transport: Arc<dyn Transport>, endpoint: Endpoint) -> Self {
        Self {
            transport,
            endpoint,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Sets the page cap for list calls.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Returns the catalog endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    // ------------------------------------------------------------------------
    // Databases and schemas
    // ------------------------------------------------------------------------

    /// Lists databases in an account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, service, or decode failures.
    pub fn list_databases(
        &self,
        account: &AccountScope,
        options: &ListOptions,
    ) -> Result<Vec<Database>, ClientError> {
        self.list(account.account(), &CATALOG_ROOT, options)
    }

    /// Gets a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the database does not exist.
    pub fn get_database(&self, database: &DatabaseScope) -> Result<Database, ClientError> {
        self.get(database.account().account(), &database_path(database, &[]))
    }

    /// Lists schemas in a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, service, or decode failures.
    pub fn list_schemas(
        &self,
        database: &DatabaseScope,
        options: &ListOptions,
    ) -> Result<Vec<Schema>, ClientError> {
        let path = database_path(database, &[CatalogKind::Schema.collection()]);
        self.list(database.account().account(), &path, options)
    }

    /// Gets a schema.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the schema does not exist.
    pub fn get_schema(&self, schema: &SchemaScope) -> Result<Schema, ClientError> {
        let path = database_path(
            schema.database(),
            &[CatalogKind::Schema.collection(), schema.schema().as_str()],
        );
        self.get(schema.database().account().account(), &path)
    }

    // ------------------------------------------------------------------------
    // Schema-scoped objects
    // ------------------------------------------------------------------------

    /// Lists tables in a schema.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, service, or decode failures.
    pub fn list_tables(
        &self,
        schema: &SchemaScope,
        options: &ListOptions,
    ) -> Result<Vec<Table>, ClientError> {
        self.list_in_schema(schema, options)
    }

    /// Gets a table.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the table does not exist.
    pub fn get_table(&self, schema: &SchemaScope, name: &str) -> Result<Table, ClientError> {
        self.get_in_schema(schema, name)
    }

    /// Lists table-valued functions in a schema.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, service, or decode failures.
    pub fn list_table_valued_functions(
        &self,
        schema: &SchemaScope,
        options: &ListOptions,
    ) -> Result<Vec<TableValuedFunction>, ClientError> {
        self.list_in_schema(schema, options)
    }

    /// Gets a table-valued function.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the function does not exist.
    pub fn get_table_valued_function(
        &self,
        schema: &SchemaScope,
        name: &str,
    ) -> Result<TableValuedFunction, ClientError> {
        self.get_in_schema(schema, name)
    }

    /// Lists views in a schema.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, service, or decode failures.
    pub fn list_views(
        &self,
        schema: &SchemaScope,
        options: &ListOptions,
    ) -> Result<Vec<View>, ClientError> {
        self.list_in_schema(schema, options)
    }

    /// Gets a view.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the view does not exist.
    pub fn get_view(&self, schema: &SchemaScope, name: &str) -> Result<View, ClientError> {
        self.get_in_schema(schema, name)
    }

    /// Lists procedures in a schema.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, service, or decode failures.
    pub fn list_procedures(
        &self,
        schema: &SchemaScope,
        options: &ListOptions,
    ) -> Result<Vec<Procedure>, ClientError> {
        self.list_in_schema(schema, options)
    }

    /// Gets a procedure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the procedure does not exist.
    pub fn get_procedure(
        &self,
        schema: &SchemaScope,
        name: &str,
    ) -> Result<Procedure, ClientError> {
        self.get_in_schema(schema, name)
    }

    /// Lists types in a schema, including built-in and complex types.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, service, or decode failures.
    pub fn list_types(
        &self,
        schema: &SchemaScope,
        options: &ListOptions,
    ) -> Result<Vec<CatalogType>, ClientError> {
        self.list_in_schema(schema, options)
    }

    // ------------------------------------------------------------------------
    // Secrets and credentials
    // ------------------------------------------------------------------------

    /// Creates a secret.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Conflict`] when the service rejects a duplicate.
    pub fn create_secret(
        &self,
        database: &DatabaseScope,
        name: &str,
        params: &SecretParameters,
    ) -> Result<Secret, ClientError> {
        self.write_secret(Method::Put, database, name, params)
    }

    /// Updates a secret's password and URI.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the secret does not exist.
    pub fn update_secret(
        &self,
        database: &DatabaseScope,
        name: &str,
        params: &SecretParameters,
    ) -> Result<Secret, ClientError> {
        self.write_secret(Method::Patch, database, name, params)
    }

    /// Gets a secret. The password is never returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the secret does not exist.
    pub fn get_secret(&self, database: &DatabaseScope, name: &str) -> Result<Secret, ClientError> {
        let name = database.object(name)?;
        let path = database_path(database, &[CatalogKind::Secret.collection(), name.as_str()]);
        self.get(database.account().account(), &path)
    }

    /// Deletes a secret.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Conflict`] when a credential still references it.
    pub fn delete_secret(&self, database: &DatabaseScope, name: &str) -> Result<(), ClientError> {
        let name = database.object(name)?;
        let path = database_path(database, &[CatalogKind::Secret.collection(), name.as_str()]);
        self.delete(database.account().account(), &path)
    }

    /// Deletes every secret in a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or service failures.
    pub fn delete_all_secrets(&self, database: &DatabaseScope) -> Result<(), ClientError> {
        let path = database_path(database, &[CatalogKind::Secret.collection()]);
        self.delete(database.account().account(), &path)
    }

    /// Lists credentials in a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, service, or decode failures.
    pub fn list_credentials(
        &self,
        database: &DatabaseScope,
        options: &ListOptions,
    ) -> Result<Vec<Credential>, ClientError> {
        let path = database_path(database, &[CatalogKind::Credential.collection()]);
        self.list(database.account().account(), &path, options)
    }

    /// Gets a credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the credential does not exist.
    pub fn get_credential(
        &self,
        database: &DatabaseScope,
        name: &str,
    ) -> Result<Credential, ClientError> {
        let name = database.object(name)?;
        let path = database_path(database, &[CatalogKind::Credential.collection(), name.as_str()]);
        self.get(database.account().account(), &path)
    }

    // ------------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------------

    /// Lists a schema-scoped collection.
    fn list_in_schema<T>(
        &self,
        schema: &SchemaScope,
        options: &ListOptions,
    ) -> Result<Vec<T>, ClientError>
    where
        T: CatalogItem + DeserializeOwned,
    {
        let path = schema_path(schema, T::KIND, None);
        self.list(schema.database().account().account(), &path, options)
    }

    /// Gets a schema-scoped object.
    fn get_in_schema<T>(&self, schema: &SchemaScope, name: &str) -> Result<T, ClientError>
    where
        T: CatalogItem + DeserializeOwned,
    {
        let name = schema.object(name)?;
        let path = schema_path(schema, T::KIND, Some(name.as_str()));
        self.get(schema.database().account().account(), &path)
    }

    /// Sends a secret create or update.
    fn write_secret(
        &self,
        method: Method,
        database: &DatabaseScope,
        name: &str,
        params: &SecretParameters,
    ) -> Result<Secret, ClientError> {
        let name = database.object(name)?;
        let path = database_path(database, &[CatalogKind::Secret.collection(), name.as_str()]);
        let url = self.endpoint.url(database.account().account(), &borrowed(&path), &[])?;
        let body = serde_json::to_value(params)
            .map_err(|err| ClientError::InvalidRequest(format!("secret encoding failed: {err}")))?;
        let request = HttpRequest::new(method, url).with_body(body);
        decode(execute(self.transport.as_ref(), &request)?)
    }

    /// Gets and decodes a single object.
    fn get<T: DeserializeOwned>(
        &self,
        account: &AccountName,
        path: &[String],
    ) -> Result<T, ClientError> {
        let url = self.endpoint.url(account, &borrowed(path), &[])?;
        decode(execute(self.transport.as_ref(), &HttpRequest::new(Method::Get, url))?)
    }

    /// Deletes a resource.
    fn delete(&self, account: &AccountName, path: &[String]) -> Result<(), ClientError> {
        let url = self.endpoint.url(account, &borrowed(path), &[])?;
        execute(self.transport.as_ref(), &HttpRequest::new(Method::Delete, url))?;
        Ok(())
    }

    /// Lists a collection across pages and enforces the filter locally.
    fn list<T>(
        &self,
        account: &AccountName,
        path: &[impl AsRef<str>],
        options: &ListOptions,
    ) -> Result<Vec<T>, ClientError>
    where
        T: CatalogItem + DeserializeOwned,
    {
        let limit = options.top.and_then(|top| usize::try_from(top).ok());
        let mut items = Vec::new();
        if limit == Some(0) {
            return Ok(items);
        }
        let segments: Vec<&str> = path.iter().map(AsRef::<str>::as_ref).collect();
        let mut url = self.endpoint.url(account, &segments, &options.query_pairs())?;
        let mut pages = 0_u32;
        loop {
            pages += 1;
            if pages > self.max_pages {
                return Err(ClientError::PageLimit {
                    limit: self.max_pages,
                });
            }
            let page: Page =
                decode(execute(self.transport.as_ref(), &HttpRequest::new(Method::Get, url))?)?;
            for raw in page.value {
                let keep = options.filter.as_ref().is_none_or(|filter| filter.matches(&raw));
                let item: T = decode_value(raw)?;
                if !keep {
                    debug!(kind = %T::KIND, name = item.name(), "dropped item rejected by filter");
                    continue;
                }
                items.push(item);
                if limit.is_some_and(|limit| items.len() >= limit) {
                    return Ok(items);
                }
            }
            match page.next_link.filter(|link| !link.is_empty()) {
                Some(link) => url = self.endpoint.next_link(account, &link)?,
                None => return Ok(items),
            }
        }
    }
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Builds `catalog/usql/databases/{db}/...` segments.
fn database_path(database: &DatabaseScope, tail: &[&str]) -> Vec<String> {
    CATALOG_ROOT
        .iter()
        .copied()
        .chain(std::iter::once(database.database().as_str()))
        .chain(tail.iter().copied())
        .map(str::to_string)
        .collect()
}

/// Builds `.../databases/{db}/schemas/{schema}/{kind}[/{name}]` segments.
fn schema_path(schema: &SchemaScope, kind: CatalogKind, name: Option<&str>) -> Vec<String> {
    let mut tail =
        vec![CatalogKind::Schema.collection(), schema.schema().as_str(), kind.collection()];
    tail.extend(name);
    database_path(schema.database(), &tail)
}

/// Borrows owned segments for URL construction.
fn borrowed(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}
