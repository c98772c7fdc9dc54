// crates/lake-catalog-core/src/models.rs
// ============================================================================
// Module: Catalog Object Models
// Description: Immutable snapshots of catalog objects returned by the service.
// Purpose: Provide serde-mapped types for every catalog resource kind.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Each catalog object is an immutable snapshot decoded from the service's JSON
//! form. Wire field names follow the service (`databaseName`, `tvfName`,
//! `isComplexType`, ...). Objects are never mutated locally; they change only
//! through explicit create/update/delete calls.
//! Invariants:
//! - [`SecretParameters`] is write-only; its password never appears in `Debug`.
//! - [`CatalogItem::name`] returns the object's own name, never a parent's.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Catalog Kinds
// ============================================================================

/// Catalog resource kind.
///
/// # Invariants
/// - Labels and collection segments are stable for URL construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CatalogKind {
    /// Database.
    Database,
    /// Schema within a database.
    Schema,
    /// Table within a schema.
    Table,
    /// Table-valued function within a schema.
    TableValuedFunction,
    /// View within a schema.
    View,
    /// Stored procedure within a schema.
    Procedure,
    /// Type within a schema.
    Type,
    /// Database-scoped secret.
    Secret,
    /// Database-scoped credential.
    Credential,
}

impl CatalogKind {
    /// All kinds in hierarchy order.
    pub const ALL: [Self; 9] = [
        Self::Database,
        Self::Schema,
        Self::Table,
        Self::TableValuedFunction,
        Self::View,
        Self::Procedure,
        Self::Type,
        Self::Secret,
        Self::Credential,
    ];

    /// Returns a stable human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Schema => "schema",
            Self::Table => "table",
            Self::TableValuedFunction => "table-valued function",
            Self::View => "view",
            Self::Procedure => "procedure",
            Self::Type => "type",
            Self::Secret => "secret",
            Self::Credential => "credential",
        }
    }

    /// Returns the REST collection segment for the kind.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Database => "databases",
            Self::Schema => "schemas",
            Self::Table => "tables",
            Self::TableValuedFunction => "tablevaluedfunctions",
            Self::View => "views",
            Self::Procedure => "procedures",
            Self::Type => "types",
            Self::Secret => "secrets",
            Self::Credential => "credentials",
        }
    }

    /// Resolves a kind from its REST collection segment.
    #[must_use]
    pub fn from_collection(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection() == segment)
    }

    /// Returns true when the kind lives directly under a schema.
    #[must_use]
    pub const fn is_schema_scoped(self) -> bool {
        matches!(
            self,
            Self::Table | Self::TableValuedFunction | Self::View | Self::Procedure | Self::Type
        )
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common accessors shared by every catalog object snapshot.
pub trait CatalogItem {
    /// Kind of catalog object.
    const KIND: CatalogKind;

    /// Returns the object's own name.
    fn name(&self) -> &str;
}

// ============================================================================
// SECTION: Database-Level Objects
// ============================================================================

/// Catalog database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Server-assigned version tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Database name.
    pub database_name: String,
}

impl CatalogItem for Database {
    const KIND: CatalogKind = CatalogKind::Database;

    fn name(&self) -> &str {
        &self.database_name
    }
}

/// Schema within a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Server-assigned version tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Parent database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Schema name.
    pub schema_name: String,
}

impl CatalogItem for Schema {
    const KIND: CatalogKind = CatalogKind::Schema;

    fn name(&self) -> &str {
        &self.schema_name
    }
}

/// Write-only payload used to create or update a secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretParameters {
    /// Secret password material.
    pub password: String,
    /// Endpoint URI the secret authenticates against.
    pub uri: String,
}

impl SecretParameters {
    /// Creates secret parameters.
    #[must_use]
    pub fn new(password: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            uri: uri.into(),
        }
    }
}

impl fmt::Debug for SecretParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretParameters")
            .field("password", &"<redacted>")
            .field("uri", &self.uri)
            .finish()
    }
}

/// Database-scoped secret. The password is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Parent database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Secret name.
    pub secret_name: String,
    /// Server-assigned creation timestamp.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_time: Option<OffsetDateTime>,
    /// Endpoint URI the secret authenticates against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl CatalogItem for Secret {
    const KIND: CatalogKind = CatalogKind::Secret;

    fn name(&self) -> &str {
        &self.secret_name
    }
}

/// Database-scoped credential referencing a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Server-assigned version tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Credential name.
    pub credential_name: String,
}

impl CatalogItem for Credential {
    const KIND: CatalogKind = CatalogKind::Credential;

    fn name(&self) -> &str {
        &self.credential_name
    }
}

// ============================================================================
// SECTION: Schema-Level Objects
// ============================================================================

/// Table column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column type as declared in the script (for example `System.Int32`).
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Server-assigned version tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Parent database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Parent schema name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Table name.
    pub table_name: String,
    /// Column definitions in declaration order.
    #[serde(default)]
    pub column_list: Vec<Column>,
}

impl CatalogItem for Table {
    const KIND: CatalogKind = CatalogKind::Table;

    fn name(&self) -> &str {
        &self.table_name
    }
}

/// Catalog table-valued function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableValuedFunction {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Server-assigned version tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Parent database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Parent schema name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Function name.
    pub tvf_name: String,
    /// Script definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl CatalogItem for TableValuedFunction {
    const KIND: CatalogKind = CatalogKind::TableValuedFunction;

    fn name(&self) -> &str {
        &self.tvf_name
    }
}

/// Catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Server-assigned version tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Parent database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Parent schema name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// View name.
    pub view_name: String,
    /// Script definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl CatalogItem for View {
    const KIND: CatalogKind = CatalogKind::View;

    fn name(&self) -> &str {
        &self.view_name
    }
}

/// Catalog stored procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Server-assigned version tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Parent database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Parent schema name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Procedure name.
    pub proc_name: String,
    /// Script definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl CatalogItem for Procedure {
    const KIND: CatalogKind = CatalogKind::Procedure;

    fn name(&self) -> &str {
        &self.proc_name
    }
}

/// Catalog type (built-in, user-defined, or complex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools, reason = "Mirrors the service's type flags.")]
pub struct CatalogType {
    /// Owning analytics account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_account_name: Option<String>,
    /// Parent database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Parent schema name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Type name.
    pub type_name: String,
    /// Type family label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_family: Option<String>,
    /// Short C# type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_sharp_name: Option<String>,
    /// Fully qualified C# type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_c_sharp_name: Option<String>,
    /// System type identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_type_id: Option<i32>,
    /// User type identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type_id: Option<i32>,
    /// Whether values may be null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
    /// Whether the type is user-defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_user_defined: Option<bool>,
    /// Whether the type is defined by an assembly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_assembly_type: Option<bool>,
    /// Whether the type is a table type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_table_type: Option<bool>,
    /// Whether the type is complex (map, array, struct).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_complex_type: Option<bool>,
}

impl CatalogType {
    /// Returns true when the service flagged the type as complex.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.is_complex_type.unwrap_or(false)
    }
}

impl CatalogItem for CatalogType {
    const KIND: CatalogKind = CatalogKind::Type;

    fn name(&self) -> &str {
        &self.type_name
    }
}
