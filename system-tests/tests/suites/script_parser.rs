// system-tests/tests/suites/script_parser.rs
// ============================================================================
// Module: Script Parser Tests
// Description: Coverage for the stub's script parser and catalog execution.
// Purpose: Keep fixture scripts and stub behavior in agreement.
// Dependencies: system-tests helpers
// ============================================================================

//! Script parsing and execution tests for the catalog stub.

use crate::helpers::catalog_state::CatalogState;
use crate::helpers::catalog_state::DuplicateSecretPolicy;
use crate::helpers::usql::ObjectKind;
use crate::helpers::usql::QualifiedName;
use crate::helpers::usql::Statement;
use crate::helpers::usql::parse_script;

#[test]
fn credential_script_parses_quoted_options() {
    let statements = parse_script(
        "USE db1; CREATE CREDENTIAL cred1 \
         WITH USER_NAME = \"scope@rkm4grspxa\", IDENTITY = \"secret1\";",
    )
    .expect("script parses");
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0], Statement::Use("db1".to_string()));
    assert_eq!(
        statements[1],
        Statement::CreateCredential {
            name: QualifiedName {
                database: None,
                schema: None,
                name: "cred1".to_string(),
            },
            if_not_exists: false,
            user_name: "scope@rkm4grspxa".to_string(),
            identity: "secret1".to_string(),
        }
    );
}

#[test]
fn function_body_is_one_statement() {
    let statements = parse_script(
        "CREATE FUNCTION db.dbo.f() RETURNS @r TABLE (a int) AS \
         BEGIN @r = SELECT 1 AS a FROM x; RETURN; END; \
         DROP FUNCTION IF EXISTS db.dbo.g;",
    )
    .expect("script parses");
    assert_eq!(statements.len(), 2);
    let Statement::CreateObject {
        kind,
        name,
        definition,
        ..
    } = &statements[0]
    else {
        panic!("expected create function");
    };
    assert_eq!(*kind, ObjectKind::Function);
    assert_eq!(name.database.as_deref(), Some("db"));
    assert_eq!(name.schema.as_deref(), Some("dbo"));
    assert!(definition.contains("RETURN;"));
    assert!(matches!(
        statements[1],
        Statement::DropObject {
            kind: ObjectKind::Function,
            if_exists: true,
            ..
        }
    ));
}

#[test]
fn table_columns_skip_index_clauses() {
    let statements = parse_script(
        "CREATE TABLE [my table] ( // comment\n id int, tags SQL.ARRAY<string>, \
         INDEX idx CLUSTERED (id ASC) DISTRIBUTED BY HASH (id) );",
    )
    .expect("script parses");
    let Statement::CreateObject {
        name,
        columns,
        ..
    } = &statements[0]
    else {
        panic!("expected create table");
    };
    assert_eq!(name.name, "my table");
    let rendered: Vec<(&str, &str)> =
        columns.iter().map(|column| (column.name.as_str(), column.data_type.as_str())).collect();
    assert_eq!(rendered, [("id", "int"), ("tags", "SQL.ARRAY<string>")]);
}

#[test]
fn unsupported_statements_are_rejected() {
    let err = parse_script("SELECT * FROM t;").unwrap_err();
    assert!(err.contains("unsupported statement"));
    assert!(parse_script("CREATE VIEW v SELECT 1;").is_err());
    assert!(parse_script("CREATE CREDENTIAL c WITH USER_NAME = \"u\";").is_err());
    assert!(parse_script("USE db extra;").is_err());
}

#[test]
fn scripts_apply_atomically() {
    let mut catalog = CatalogState::new("acct", DuplicateSecretPolicy::Reject);
    catalog.run_script("CREATE DATABASE a; USE a; CREATE TABLE t (x int);").expect("script runs");
    assert!(catalog.schema_item("a", "dbo", lake_catalog_core::CatalogKind::Table, "t").is_ok());

    let err = catalog
        .run_script("CREATE DATABASE b; USE b; CREATE TABLE a.dbo.t (x int);")
        .unwrap_err();
    assert!(err.contains("already exists"));
    assert!(catalog.database("b").is_err());

    catalog
        .run_script("CREATE DATABASE IF NOT EXISTS a; DROP TABLE IF EXISTS a.dbo.missing;")
        .expect("guarded statements succeed");
}

#[test]
fn credentials_require_an_existing_secret() {
    let mut catalog = CatalogState::new("acct", DuplicateSecretPolicy::Reject);
    let err = catalog
        .run_script(r#"CREATE CREDENTIAL c WITH USER_NAME = "u", IDENTITY = "missing";"#)
        .unwrap_err();
    assert!(err.contains("secret missing does not exist"));

    catalog.create_secret("master", "s", "https://example.test").expect("secret created");
    catalog
        .run_script(r#"CREATE CREDENTIAL c WITH USER_NAME = "u", IDENTITY = "s";"#)
        .expect("credential created");
    let credential = catalog.credential("master", "c").expect("credential readable");
    assert_eq!(credential["credentialName"], "c");
    assert!(catalog.delete_secret("master", "s").is_err());
}
