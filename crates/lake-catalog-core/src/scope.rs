// crates/lake-catalog-core/src/scope.rs
// ============================================================================
// Module: Catalog Scopes
// Description: Typed account → database → schema addressing chain.
// Purpose: Make parent-before-child addressing a compile-time guarantee.
// Dependencies: crate::identifiers
// ============================================================================

//! ## Overview
//! A catalog object is addressed by the composite key (account, database,
//! schema, object). Each level is a distinct type that can only be built from
//! its parent, so a schema-scoped call can never be issued without a
//! validated account and database.
//! Invariants:
//! - Every segment held by a scope passed [`validate_segment`].
//! - [`SchemaScope`] always carries the [`DatabaseScope`] it was derived from.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::identifiers::AccountName;
use crate::identifiers::DatabaseName;
use crate::identifiers::IdentifierError;
use crate::identifiers::ObjectName;
use crate::identifiers::SchemaName;
use crate::identifiers::validate_segment;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Schema created alongside every database.
pub const DEFAULT_SCHEMA: &str = "dbo";

// ============================================================================
// SECTION: Scope Types
// ============================================================================

/// Root scope: a single analytics account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountScope {
    /// Validated account name.
    account: AccountName,
}

impl AccountScope {
    /// Creates an account scope.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the account name is not a valid segment.
    pub fn new(account: impl Into<AccountName>) -> Result<Self, IdentifierError> {
        let account = account.into();
        validate_segment("account", account.as_str())?;
        Ok(Self {
            account,
        })
    }

    /// Returns the account name.
    #[must_use]
    pub const fn account(&self) -> &AccountName {
        &self.account
    }

    /// Derives a database scope under this account.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the database name is not a valid segment.
    pub fn database(
        &self,
        database: impl Into<DatabaseName>,
    ) -> Result<DatabaseScope, IdentifierError> {
        let database = database.into();
        validate_segment("database", database.as_str())?;
        Ok(DatabaseScope {
            account: self.clone(),
            database,
        })
    }
}

impl fmt::Display for AccountScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.account.fmt(f)
    }
}

/// Database scope within an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseScope {
    /// Parent account scope.
    account: AccountScope,
    /// Validated database name.
    database: DatabaseName,
}

impl DatabaseScope {
    /// Returns the parent account scope.
    #[must_use]
    pub const fn account(&self) -> &AccountScope {
        &self.account
    }

    /// Returns the database name.
    #[must_use]
    pub const fn database(&self) -> &DatabaseName {
        &self.database
    }

    /// Derives a schema scope within this database.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the schema name is not a valid segment.
    pub fn schema(&self, schema: impl Into<SchemaName>) -> Result<SchemaScope, IdentifierError> {
        let schema = schema.into();
        validate_segment("schema", schema.as_str())?;
        Ok(SchemaScope {
            database: self.clone(),
            schema,
        })
    }

    /// Derives the default `dbo` schema scope.
    #[must_use]
    pub fn default_schema(&self) -> SchemaScope {
        SchemaScope {
            database: self.clone(),
            schema: SchemaName::new(DEFAULT_SCHEMA),
        }
    }

    /// Validates an object name for a database-scoped object (secret, credential).
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the object name is not a valid segment.
    pub fn object(&self, name: impl Into<ObjectName>) -> Result<ObjectName, IdentifierError> {
        checked_object(name.into())
    }
}

impl fmt::Display for DatabaseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.database)
    }
}

/// Schema scope within a database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaScope {
    /// Parent database scope.
    database: DatabaseScope,
    /// Validated schema name.
    schema: SchemaName,
}

impl SchemaScope {
    /// Returns the parent database scope.
    #[must_use]
    pub const fn database(&self) -> &DatabaseScope {
        &self.database
    }

    /// Returns the schema name.
    #[must_use]
    pub const fn schema(&self) -> &SchemaName {
        &self.schema
    }

    /// Validates an object name for a schema-scoped object.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the object name is not a valid segment.
    pub fn object(&self, name: impl Into<ObjectName>) -> Result<ObjectName, IdentifierError> {
        checked_object(name.into())
    }
}

impl fmt::Display for SchemaScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.schema)
    }
}

/// Validates an object name segment.
fn checked_object(name: ObjectName) -> Result<ObjectName, IdentifierError> {
    validate_segment("object", name.as_str())?;
    Ok(name)
}
