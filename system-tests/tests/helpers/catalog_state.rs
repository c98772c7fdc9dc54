// system-tests/tests/helpers/catalog_state.rs
// ============================================================================
// Module: Stub Catalog State
// Description: In-memory catalog behind the stub service.
// Purpose: Hold databases, schema objects, secrets and credentials, and apply
//          job scripts to them.
// Dependencies: lake-catalog-core, serde_json, time
// ============================================================================

//! ## Overview
//! [`CatalogState`] is the stub's catalog. Reads render the service's JSON
//! wire form; writes come from secret calls and from job scripts. A script
//! is applied to a copy of the catalog and committed only when every
//! statement succeeds.
//! Invariants:
//! - Every database has a `dbo` schema, and every schema lists the built-in types.
//! - A secret referenced by a credential cannot be deleted.
//! - The `master` database always exists.

use std::collections::BTreeMap;

use lake_catalog_core::CatalogKind;
use lake_catalog_core::DEFAULT_SCHEMA;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::usql::ColumnDef;
use super::usql::ObjectKind;
use super::usql::QualifiedName;
use super::usql::Statement;
use super::usql::parse_script;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Database present in every account.
pub const MASTER_DATABASE: &str = "master";

/// Built-in types: (name, family, C# name, complex).
const BUILTIN_TYPES: [(&str, &str, &str, bool); 10] = [
    ("int", "int", "System.Int32", false),
    ("long", "long", "System.Int64", false),
    ("string", "string", "System.String", false),
    ("bool", "bool", "System.Boolean", false),
    ("double", "double", "System.Double", false),
    ("DateTime", "DateTime", "System.DateTime", false),
    ("Guid", "Guid", "System.Guid", false),
    ("byte[]", "byte[]", "System.Byte[]", false),
    ("SQL.ARRAY<string>", "SQL.ARRAY", "Microsoft.Analytics.Types.Sql.SqlArray<string>", true),
    (
        "SQL.MAP<string,string>",
        "SQL.MAP",
        "Microsoft.Analytics.Types.Sql.SqlMap<string,string>",
        true,
    ),
];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Service-style failure returned by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubError {
    /// HTTP status.
    pub status: u16,
    /// Service error code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl StubError {
    /// 404 for a missing catalog object.
    pub fn not_found(kind: CatalogKind, name: &str) -> Self {
        Self {
            status: 404,
            code: "CatalogObjectNotFound",
            message: format!("{kind} {name} does not exist"),
        }
    }

    /// 409 for a conflicting write.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: 409,
            code: "Conflict",
            message: message.into(),
        }
    }

    /// 400 for a malformed request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            code: "BadRequest",
            message: message.into(),
        }
    }

    /// Renders the `{"error": {code, message}}` envelope.
    pub fn body(&self) -> Value {
        json!({ "error": { "code": self.code, "message": self.message } })
    }
}

// ============================================================================
// SECTION: Policies
// ============================================================================

/// How the stub answers a create for an existing secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateSecretPolicy {
    /// Answer 409 Conflict.
    #[default]
    Reject,
    /// Replace the existing secret.
    Overwrite,
}

// ============================================================================
// SECTION: State Types
// ============================================================================

/// Stored secret; the password is accepted but never kept.
#[derive(Debug, Clone)]
struct SecretRecord {
    /// Endpoint URI.
    uri: String,
    /// Server-assigned creation time.
    creation_time: OffsetDateTime,
}

/// Stored credential.
#[derive(Debug, Clone)]
struct CredentialRecord {
    /// Remote user name.
    user_name: String,
    /// Referenced secret.
    identity: String,
}

/// Objects within one schema.
#[derive(Debug, Clone, Default)]
struct SchemaState {
    /// Tables and their columns.
    tables: BTreeMap<String, Vec<ColumnDef>>,
    /// Table-valued function definitions.
    functions: BTreeMap<String, String>,
    /// View definitions.
    views: BTreeMap<String, String>,
    /// Procedure definitions.
    procedures: BTreeMap<String, String>,
}

impl SchemaState {
    /// Returns the map holding `kind`.
    const fn objects(&self, kind: ObjectKind) -> Option<&BTreeMap<String, String>> {
        match kind {
            ObjectKind::Table => None,
            ObjectKind::Function => Some(&self.functions),
            ObjectKind::View => Some(&self.views),
            ObjectKind::Procedure => Some(&self.procedures),
        }
    }

    /// Returns true when an object of `kind` named `name` exists.
    fn contains(&self, kind: ObjectKind, name: &str) -> bool {
        match self.objects(kind) {
            Some(objects) => objects.contains_key(name),
            None => self.tables.contains_key(name),
        }
    }

    /// Removes an object; returns true when it existed.
    fn remove(&mut self, kind: ObjectKind, name: &str) -> bool {
        match kind {
            ObjectKind::Table => self.tables.remove(name).is_some(),
            ObjectKind::Function => self.functions.remove(name).is_some(),
            ObjectKind::View => self.views.remove(name).is_some(),
            ObjectKind::Procedure => self.procedures.remove(name).is_some(),
        }
    }
}

/// One database.
#[derive(Debug, Clone)]
struct DatabaseState {
    /// Schemas by name.
    schemas: BTreeMap<String, SchemaState>,
    /// Secrets by name.
    secrets: BTreeMap<String, SecretRecord>,
    /// Credentials by name.
    credentials: BTreeMap<String, CredentialRecord>,
}

impl Default for DatabaseState {
    fn default() -> Self {
        Self {
            schemas: BTreeMap::from([(DEFAULT_SCHEMA.to_string(), SchemaState::default())]),
            secrets: BTreeMap::new(),
            credentials: BTreeMap::new(),
        }
    }
}

/// Stub catalog for one account.
#[derive(Debug, Clone)]
pub struct CatalogState {
    /// Account name echoed in rendered objects.
    account: String,
    /// Databases by name.
    databases: BTreeMap<String, DatabaseState>,
    /// Duplicate secret handling.
    duplicate_secrets: DuplicateSecretPolicy,
}

// ============================================================================
// SECTION: Reads
// ============================================================================

impl CatalogState {
    /// Creates a catalog holding only `master`.
    pub fn new(account: impl Into<String>, duplicate_secrets: DuplicateSecretPolicy) -> Self {
        Self {
            account: account.into(),
            databases: BTreeMap::from([(MASTER_DATABASE.to_string(), DatabaseState::default())]),
            duplicate_secrets,
        }
    }

    /// Lists databases.
    pub fn databases(&self) -> Vec<Value> {
        self.databases.keys().map(|name| self.render_database(name)).collect()
    }

    /// Gets a database.
    pub fn database(&self, name: &str) -> Result<Value, StubError> {
        self.db(name)?;
        Ok(self.render_database(name))
    }

    /// Lists schemas in a database.
    pub fn schemas(&self, database: &str) -> Result<Vec<Value>, StubError> {
        let db = self.db(database)?;
        Ok(db.schemas.keys().map(|schema| self.render_schema(database, schema)).collect())
    }

    /// Gets a schema.
    pub fn schema(&self, database: &str, schema: &str) -> Result<Value, StubError> {
        self.schema_state(database, schema)?;
        Ok(self.render_schema(database, schema))
    }

    /// Lists a schema-scoped collection.
    pub fn schema_items(
        &self,
        database: &str,
        schema: &str,
        kind: CatalogKind,
    ) -> Result<Vec<Value>, StubError> {
        let state = self.schema_state(database, schema)?;
        let items = match kind {
            CatalogKind::Table => state
                .tables
                .iter()
                .map(|(name, columns)| self.render_table(database, schema, name, columns))
                .collect(),
            CatalogKind::Type => BUILTIN_TYPES
                .iter()
                .enumerate()
                .map(|(index, builtin)| self.render_type(database, schema, index, *builtin))
                .collect(),
            CatalogKind::TableValuedFunction | CatalogKind::View | CatalogKind::Procedure => {
                let object_kind = object_kind(kind);
                state
                    .objects(object_kind)
                    .into_iter()
                    .flatten()
                    .map(|(name, definition)| {
                        self.render_routine(database, schema, kind, name, definition)
                    })
                    .collect()
            }
            _ => return Err(StubError::bad_request(format!("{kind} is not schema scoped"))),
        };
        Ok(items)
    }

    /// Gets a schema-scoped object.
    pub fn schema_item(
        &self,
        database: &str,
        schema: &str,
        kind: CatalogKind,
        name: &str,
    ) -> Result<Value, StubError> {
        let name_field = match kind {
            CatalogKind::Table => "tableName",
            CatalogKind::TableValuedFunction => "tvfName",
            CatalogKind::View => "viewName",
            CatalogKind::Procedure => "procName",
            CatalogKind::Type => "typeName",
            _ => return Err(StubError::bad_request(format!("{kind} is not schema scoped"))),
        };
        self.schema_items(database, schema, kind)?
            .into_iter()
            .find(|item| item[name_field] == name)
            .ok_or_else(|| StubError::not_found(kind, name))
    }

    /// Lists credentials in a database.
    pub fn credentials(&self, database: &str) -> Result<Vec<Value>, StubError> {
        let db = self.db(database)?;
        Ok(db
            .credentials
            .iter()
            .map(|(name, record)| self.render_credential(database, name, record))
            .collect())
    }

    /// Gets a credential.
    pub fn credential(&self, database: &str, name: &str) -> Result<Value, StubError> {
        let record = self
            .db(database)?
            .credentials
            .get(name)
            .ok_or_else(|| StubError::not_found(CatalogKind::Credential, name))?;
        Ok(self.render_credential(database, name, record))
    }

    /// Gets a secret; the password is never part of the response.
    pub fn secret(&self, database: &str, name: &str) -> Result<Value, StubError> {
        let record = self
            .db(database)?
            .secrets
            .get(name)
            .ok_or_else(|| StubError::not_found(CatalogKind::Secret, name))?;
        Ok(self.render_secret(database, name, record))
    }

    /// Returns true when a secret exists.
    pub fn has_secret(&self, database: &str, name: &str) -> bool {
        self.databases.get(database).is_some_and(|db| db.secrets.contains_key(name))
    }
}

// ============================================================================
// SECTION: Writes
// ============================================================================

impl CatalogState {
    /// Creates a secret.
    pub fn create_secret(
        &mut self,
        database: &str,
        name: &str,
        uri: &str,
    ) -> Result<Value, StubError> {
        let policy = self.duplicate_secrets;
        let db = self.db_mut(database)?;
        if db.secrets.contains_key(name) && policy == DuplicateSecretPolicy::Reject {
            return Err(StubError::conflict(format!("secret {name} already exists")));
        }
        db.secrets.insert(
            name.to_string(),
            SecretRecord {
                uri: uri.to_string(),
                creation_time: OffsetDateTime::now_utc(),
            },
        );
        self.secret(database, name)
    }

    /// Updates a secret's URI.
    pub fn update_secret(
        &mut self,
        database: &str,
        name: &str,
        uri: &str,
    ) -> Result<Value, StubError> {
        let record = self
            .db_mut(database)?
            .secrets
            .get_mut(name)
            .ok_or_else(|| StubError::not_found(CatalogKind::Secret, name))?;
        uri.clone_into(&mut record.uri);
        self.secret(database, name)
    }

    /// Deletes a secret unless a credential references it.
    pub fn delete_secret(&mut self, database: &str, name: &str) -> Result<(), StubError> {
        let db = self.db_mut(database)?;
        if !db.secrets.contains_key(name) {
            return Err(StubError::not_found(CatalogKind::Secret, name));
        }
        if let Some((credential, _)) =
            db.credentials.iter().find(|(_, record)| record.identity == name)
        {
            return Err(StubError::conflict(format!(
                "secret {name} is referenced by credential {credential}"
            )));
        }
        db.secrets.remove(name);
        Ok(())
    }

    /// Deletes every secret in a database unless one is referenced.
    pub fn delete_all_secrets(&mut self, database: &str) -> Result<(), StubError> {
        let db = self.db_mut(database)?;
        if let Some(record) =
            db.credentials.values().find(|record| db.secrets.contains_key(&record.identity))
        {
            return Err(StubError::conflict(format!(
                "secret {} is referenced by a credential",
                record.identity
            )));
        }
        db.secrets.clear();
        Ok(())
    }

    /// Parses and applies a job script atomically.
    ///
    /// # Errors
    ///
    /// Returns the first parse or execution error; the catalog is unchanged.
    pub fn run_script(&mut self, script: &str) -> Result<(), String> {
        let statements = parse_script(script)?;
        let mut scratch = self.clone();
        let mut current = MASTER_DATABASE.to_string();
        for statement in statements {
            scratch.apply(&mut current, statement)?;
        }
        *self = scratch;
        Ok(())
    }

    /// Applies one statement with `current` as the active database.
    fn apply(&mut self, current: &mut String, statement: Statement) -> Result<(), String> {
        match statement {
            Statement::Use(name) => {
                if !self.databases.contains_key(&name) {
                    return Err(format!("database {name} does not exist"));
                }
                *current = name;
            }
            Statement::CreateDatabase {
                name,
                if_not_exists,
            } => {
                if self.databases.contains_key(&name) {
                    return exists_or_err(if_not_exists, "database", &name);
                }
                self.databases.insert(name, DatabaseState::default());
            }
            Statement::DropDatabase {
                name,
                if_exists,
            } => {
                if name == MASTER_DATABASE {
                    return Err("database master cannot be dropped".to_string());
                }
                if self.databases.remove(&name).is_none() {
                    return missing_or_err(if_exists, "database", &name);
                }
                if *current == name {
                    MASTER_DATABASE.clone_into(current);
                }
            }
            Statement::CreateSchema {
                name,
                if_not_exists,
            } => {
                let database = name.schema.clone().unwrap_or_else(|| current.clone());
                let db = self.script_db(&database)?;
                if db.schemas.contains_key(&name.name) {
                    return exists_or_err(if_not_exists, "schema", &name.name);
                }
                db.schemas.insert(name.name, SchemaState::default());
            }
            Statement::CreateObject {
                kind,
                name,
                if_not_exists,
                columns,
                definition,
            } => {
                let schema = self.script_schema(current, &name)?;
                if schema.contains(kind, &name.name) {
                    return exists_or_err(if_not_exists, kind_label(kind), &name.name);
                }
                match kind {
                    ObjectKind::Table => {
                        schema.tables.insert(name.name, columns);
                    }
                    ObjectKind::Function => {
                        schema.functions.insert(name.name, definition);
                    }
                    ObjectKind::View => {
                        schema.views.insert(name.name, definition);
                    }
                    ObjectKind::Procedure => {
                        schema.procedures.insert(name.name, definition);
                    }
                }
            }
            Statement::DropObject {
                kind,
                name,
                if_exists,
            } => {
                let schema = self.script_schema(current, &name)?;
                if !schema.remove(kind, &name.name) {
                    return missing_or_err(if_exists, kind_label(kind), &name.name);
                }
            }
            Statement::CreateCredential {
                name,
                if_not_exists,
                user_name,
                identity,
            } => {
                let database = name.schema.clone().unwrap_or_else(|| current.clone());
                let db = self.script_db(&database)?;
                if db.credentials.contains_key(&name.name) {
                    return exists_or_err(if_not_exists, "credential", &name.name);
                }
                if !db.secrets.contains_key(&identity) {
                    return Err(format!("secret {identity} does not exist in {database}"));
                }
                db.credentials.insert(
                    name.name,
                    CredentialRecord {
                        user_name,
                        identity,
                    },
                );
            }
            Statement::DropCredential {
                name,
                if_exists,
            } => {
                let database = name.schema.clone().unwrap_or_else(|| current.clone());
                let db = self.script_db(&database)?;
                if db.credentials.remove(&name.name).is_none() {
                    return missing_or_err(if_exists, "credential", &name.name);
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Lookup Helpers
// ============================================================================

impl CatalogState {
    /// Looks up a database for a read.
    fn db(&self, name: &str) -> Result<&DatabaseState, StubError> {
        self.databases.get(name).ok_or_else(|| StubError::not_found(CatalogKind::Database, name))
    }

    /// Looks up a database for a write.
    fn db_mut(&mut self, name: &str) -> Result<&mut DatabaseState, StubError> {
        self.databases
            .get_mut(name)
            .ok_or_else(|| StubError::not_found(CatalogKind::Database, name))
    }

    /// Looks up a schema for a read.
    fn schema_state(&self, database: &str, schema: &str) -> Result<&SchemaState, StubError> {
        self.db(database)?
            .schemas
            .get(schema)
            .ok_or_else(|| StubError::not_found(CatalogKind::Schema, schema))
    }

    /// Looks up a database from a script.
    fn script_db(&mut self, name: &str) -> Result<&mut DatabaseState, String> {
        self.databases.get_mut(name).ok_or_else(|| format!("database {name} does not exist"))
    }

    /// Resolves a qualified object name to its schema from a script.
    fn script_schema(
        &mut self,
        current: &str,
        name: &QualifiedName,
    ) -> Result<&mut SchemaState, String> {
        let database = name.database.as_deref().unwrap_or(current).to_string();
        let schema = name.schema.as_deref().unwrap_or(DEFAULT_SCHEMA);
        self.script_db(&database)?
            .schemas
            .get_mut(schema)
            .ok_or_else(|| format!("schema {database}.{schema} does not exist"))
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

impl CatalogState {
    /// Renders a database.
    fn render_database(&self, name: &str) -> Value {
        json!({ "computeAccountName": self.account, "databaseName": name })
    }

    /// Renders a schema.
    fn render_schema(&self, database: &str, schema: &str) -> Value {
        json!({
            "computeAccountName": self.account,
            "databaseName": database,
            "schemaName": schema,
        })
    }

    /// Renders a table.
    fn render_table(
        &self,
        database: &str,
        schema: &str,
        name: &str,
        columns: &[ColumnDef],
    ) -> Value {
        let columns: Vec<Value> = columns
            .iter()
            .map(|column| json!({ "name": column.name, "type": column.data_type }))
            .collect();
        json!({
            "computeAccountName": self.account,
            "databaseName": database,
            "schemaName": schema,
            "tableName": name,
            "columnList": columns,
        })
    }

    /// Renders a function, view, or procedure.
    fn render_routine(
        &self,
        database: &str,
        schema: &str,
        kind: CatalogKind,
        name: &str,
        definition: &str,
    ) -> Value {
        let name_field = match kind {
            CatalogKind::TableValuedFunction => "tvfName",
            CatalogKind::View => "viewName",
            _ => "procName",
        };
        let mut item = json!({
            "computeAccountName": self.account,
            "databaseName": database,
            "schemaName": schema,
            "definition": definition,
        });
        item[name_field] = Value::String(name.to_string());
        item
    }

    /// Renders a built-in type.
    fn render_type(
        &self,
        database: &str,
        schema: &str,
        index: usize,
        (name, family, c_sharp, complex): (&str, &str, &str, bool),
    ) -> Value {
        json!({
            "computeAccountName": self.account,
            "databaseName": database,
            "schemaName": schema,
            "typeName": name,
            "typeFamily": family,
            "cSharpName": c_sharp,
            "fullCSharpName": c_sharp,
            "systemTypeId": index + 1,
            "userTypeId": index + 1,
            "isNullable": !complex,
            "isUserDefined": false,
            "isAssemblyType": false,
            "isTableType": false,
            "isComplexType": complex,
        })
    }

    /// Renders a secret without its password.
    fn render_secret(&self, database: &str, name: &str, record: &SecretRecord) -> Value {
        let creation_time = record.creation_time.format(&Rfc3339).ok();
        json!({
            "computeAccountName": self.account,
            "databaseName": database,
            "secretName": name,
            "creationTime": creation_time,
            "uri": record.uri,
        })
    }

    /// Renders a credential.
    fn render_credential(&self, database: &str, name: &str, record: &CredentialRecord) -> Value {
        json!({
            "computeAccountName": self.account,
            "databaseName": database,
            "credentialName": name,
            "userName": record.user_name,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a routine catalog kind to its script kind.
const fn object_kind(kind: CatalogKind) -> ObjectKind {
    match kind {
        CatalogKind::TableValuedFunction => ObjectKind::Function,
        CatalogKind::View => ObjectKind::View,
        CatalogKind::Procedure => ObjectKind::Procedure,
        _ => ObjectKind::Table,
    }
}

/// Returns the label used in script errors.
const fn kind_label(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Table => "table",
        ObjectKind::View => "view",
        ObjectKind::Function => "function",
        ObjectKind::Procedure => "procedure",
    }
}

/// Succeeds for `IF NOT EXISTS`, otherwise reports the duplicate.
fn exists_or_err(if_not_exists: bool, kind: &str, name: &str) -> Result<(), String> {
    if if_not_exists { Ok(()) } else { Err(format!("{kind} {name} already exists")) }
}

/// Succeeds for `IF EXISTS`, otherwise reports the missing object.
fn missing_or_err(if_exists: bool, kind: &str, name: &str) -> Result<(), String> {
    if if_exists { Ok(()) } else { Err(format!("{kind} {name} does not exist")) }
}
