// crates/lake-catalog-core/src/lib.rs
// ============================================================================
// Module: Lake Catalog Core Library
// Description: Public API surface for catalog identifiers, models, and queries.
// Purpose: Expose transport-free types shared by the client and system tests.
// Dependencies: crate::{identifiers, scope, models, jobs, query, filter}
// ============================================================================

//! ## Overview
//! Lake catalog core holds the typed vocabulary of the analytics catalog API:
//! name newtypes, the account → database → schema scope chain, immutable
//! catalog object snapshots, job models, and the OData list options with a
//! filter-expression evaluator. Nothing in this crate performs I/O.
//! Invariants:
//! - A child scope can only be derived from its validated parent scope.
//! - Catalog objects are snapshots; mutation happens only through remote calls.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod filter;
pub mod identifiers;
pub mod jobs;
pub mod models;
pub mod query;
pub mod scope;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use filter::CompareOp;
pub use filter::Comparison;
pub use filter::Filter;
pub use filter::FilterError;
pub use filter::FilterNode;
pub use filter::Literal;
pub use identifiers::AccountName;
pub use identifiers::DatabaseName;
pub use identifiers::IdentifierError;
pub use identifiers::JobId;
pub use identifiers::ObjectName;
pub use identifiers::SchemaName;
pub use identifiers::validate_segment;
pub use jobs::JobErrorDetail;
pub use jobs::JobInformation;
pub use jobs::JobProperties;
pub use jobs::JobResult;
pub use jobs::JobState;
pub use jobs::JobSubmission;
pub use jobs::JobSubmissionWire;
pub use models::CatalogItem;
pub use models::CatalogKind;
pub use models::CatalogType;
pub use models::Column;
pub use models::Credential;
pub use models::Database;
pub use models::Procedure;
pub use models::Schema;
pub use models::Secret;
pub use models::SecretParameters;
pub use models::Table;
pub use models::TableValuedFunction;
pub use models::View;
pub use query::ListOptions;
pub use scope::AccountScope;
pub use scope::DatabaseScope;
pub use scope::DEFAULT_SCHEMA;
pub use scope::SchemaScope;
