// system-tests/tests/helpers/scenarios.rs
// ============================================================================
// Module: Catalog Scenarios
// Description: End-to-end catalog flows shared by several test binaries.
// Purpose: Run the same scenario body against the stub, a live account, or a recording.
// Dependencies: lake-catalog-client, lake-catalog-core
// ============================================================================

//! ## Overview
//! Each scenario takes a started [`ScenarioHarness`] and returns notes for the
//! run summary. Scenarios assert with `Result` so a failure names the step
//! that broke, whichever transport is underneath.

use lake_catalog_core::Filter;
use lake_catalog_core::ListOptions;
use lake_catalog_core::SecretParameters;

use super::fixture::CatalogFixture;
use super::fixture::TABLE_COLUMNS;
use super::fixture::run_script;
use super::harness::ScenarioHarness;

/// Password used for scenario secrets; recordings must never contain it.
pub const SECRET_PASSWORD: &str = "Scenario-p@ss-4711";

/// URI stored on scenario secrets.
pub const SECRET_URI: &str = "https://adlasecrettest.contoso.com:443";

/// Remote user name stored on scenario credentials.
const CREDENTIAL_USER: &str = "scope@rkm4grspxa";

/// Returns `Err(message)` unless `condition` holds.
fn check(condition: bool, message: impl Into<String>) -> Result<(), String> {
    if condition { Ok(()) } else { Err(message.into()) }
}

/// Lists and gets every catalog object kind the fixture creates.
///
/// # Errors
///
/// Returns a message naming the first step that failed.
pub fn get_catalog_items(harness: &ScenarioHarness) -> Result<Vec<String>, String> {
    let fixture = CatalogFixture::provision(harness)?;
    let catalog = harness.catalog();
    let database = fixture.database_scope(harness)?;
    let schema = fixture.schema_scope(harness)?;
    let mut notes = vec![format!("provisioned database {}", fixture.database)];

    let databases = catalog
        .list_databases(harness.account(), &ListOptions::new())
        .map_err(|err| format!("list databases: {err}"))?;
    check(
        databases.iter().any(|db| db.database_name == fixture.database),
        "fixture database missing from list",
    )?;
    let db = catalog.get_database(&database).map_err(|err| format!("get database: {err}"))?;
    check(db.database_name == fixture.database, "get database returned another name")?;
    notes.push(format!("listed {} databases", databases.len()));

    let tables = catalog
        .list_tables(&schema, &ListOptions::new())
        .map_err(|err| format!("list tables: {err}"))?;
    check(tables.iter().any(|table| table.table_name == fixture.table), "table missing from list")?;
    let table =
        catalog.get_table(&schema, &fixture.table).map_err(|err| format!("get table: {err}"))?;
    check(table.table_name == fixture.table, "get table returned another name")?;
    let columns: Vec<&str> = table.column_list.iter().map(|column| column.name.as_str()).collect();
    check(columns == TABLE_COLUMNS, format!("unexpected table columns {}", columns.join(",")))?;

    let functions = catalog
        .list_table_valued_functions(&schema, &ListOptions::new())
        .map_err(|err| format!("list functions: {err}"))?;
    check(
        functions.iter().any(|tvf| tvf.tvf_name == fixture.function),
        "function missing from list",
    )?;
    let function = catalog
        .get_table_valued_function(&schema, &fixture.function)
        .map_err(|err| format!("get function: {err}"))?;
    check(function.tvf_name == fixture.function, "get function returned another name")?;

    let views = catalog
        .list_views(&schema, &ListOptions::new())
        .map_err(|err| format!("list views: {err}"))?;
    check(views.iter().any(|view| view.view_name == fixture.view), "view missing from list")?;
    let view = catalog.get_view(&schema, &fixture.view).map_err(|err| format!("get view: {err}"))?;
    check(view.view_name == fixture.view, "get view returned another name")?;

    let procedures = catalog
        .list_procedures(&schema, &ListOptions::new())
        .map_err(|err| format!("list procedures: {err}"))?;
    check(
        procedures.iter().any(|procedure| procedure.proc_name == fixture.procedure),
        "procedure missing from list",
    )?;
    let procedure = catalog
        .get_procedure(&schema, &fixture.procedure)
        .map_err(|err| format!("get procedure: {err}"))?;
    check(procedure.proc_name == fixture.procedure, "get procedure returned another name")?;

    let types = catalog
        .list_types(&schema, &ListOptions::new())
        .map_err(|err| format!("list types: {err}"))?;
    check(!types.is_empty(), "type list is empty")?;
    let not_complex =
        Filter::equals("isComplexType", false).map_err(|err| format!("type filter: {err}"))?;
    let simple = catalog
        .list_types(&schema, &ListOptions::new().filter(not_complex))
        .map_err(|err| format!("list simple types: {err}"))?;
    check(!simple.is_empty(), "filtered type list is empty")?;
    check(!simple.iter().any(|item| item.is_complex()), "filter returned a complex type")?;
    notes.push(format!("{} types, {} not complex", types.len(), simple.len()));
    Ok(notes)
}

/// Creates a secret, binds a credential to it, then tears both down.
///
/// # Errors
///
/// Returns a message naming the first step that failed.
pub fn secret_credential_crud(harness: &ScenarioHarness) -> Result<Vec<String>, String> {
    let context = harness.context();
    let catalog = harness.catalog();
    let database_name = context.generate_name("db").map_err(|err| err.to_string())?;
    let secret = context.generate_name("secret").map_err(|err| err.to_string())?;
    let credential = context.generate_name("cred").map_err(|err| err.to_string())?;
    run_script(harness, "create secret database", &format!("CREATE DATABASE {database_name};"))
        .map_err(|err| format!("create database job: {err}"))?;
    let database = harness
        .account()
        .database(database_name.as_str())
        .map_err(|err| err.to_string())?;

    let created = catalog
        .create_secret(&database, &secret, &SecretParameters::new(SECRET_PASSWORD, SECRET_URI))
        .map_err(|err| format!("create secret: {err}"))?;
    check(created.secret_name == secret, "create secret returned another name")?;
    let fetched =
        catalog.get_secret(&database, &secret).map_err(|err| format!("get secret: {err}"))?;
    check(fetched.creation_time.is_some(), "secret has no creation time")?;

    let create_credential = format!(
        "USE {database_name}; CREATE CREDENTIAL {credential} \
         WITH USER_NAME = \"{CREDENTIAL_USER}\", IDENTITY = \"{secret}\";"
    );
    run_script(harness, "create credential", &create_credential)
        .map_err(|err| format!("create credential job: {err}"))?;
    let credentials = catalog
        .list_credentials(&database, &ListOptions::new())
        .map_err(|err| format!("list credentials: {err}"))?;
    check(
        credentials.iter().any(|item| item.credential_name == credential),
        "credential missing from list",
    )?;
    let fetched = catalog
        .get_credential(&database, &credential)
        .map_err(|err| format!("get credential: {err}"))?;
    check(fetched.credential_name == credential, "get credential returned another name")?;

    let drop_credential = format!("USE {database_name}; DROP CREDENTIAL {credential};");
    run_script(harness, "drop credential", &drop_credential)
        .map_err(|err| format!("drop credential job: {err}"))?;
    catalog.delete_secret(&database, &secret).map_err(|err| format!("delete secret: {err}"))?;
    match catalog.get_secret(&database, &secret) {
        Err(err) if err.is_not_found() => {}
        Err(err) => return Err(format!("get deleted secret failed unexpectedly: {err}")),
        Ok(_) => return Err("deleted secret is still readable".to_string()),
    }
    Ok(vec![format!("secret {secret} and credential {credential} round-tripped")])
}
