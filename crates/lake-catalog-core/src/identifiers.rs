// crates/lake-catalog-core/src/identifiers.rs
// ============================================================================
// Module: Catalog Identifiers
// Description: Opaque name newtypes for accounts, databases, schemas, and jobs.
// Purpose: Provide strongly typed, serializable names with stable string forms.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! Names are opaque strings that serialize transparently. Construction does not
//! validate; validation happens when names are bound into a scope (see
//! [`crate::scope`]) through [`validate_segment`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum length of a single name segment in bytes.
pub const MAX_SEGMENT_BYTES: usize = 128;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Declares a transparent string identifier with the standard conversions.
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_identifier!(
    /// Analytics account name. Selects the service endpoint.
    AccountName
);

string_identifier!(
    /// Catalog database name.
    DatabaseName
);

string_identifier!(
    /// Schema name within a database.
    SchemaName
);

string_identifier!(
    /// Name of a schema- or database-scoped catalog object.
    ObjectName
);

string_identifier!(
    /// Job identifier (a UUID in canonical hyphenated form).
    JobId
);

impl JobId {
    /// Generates a fresh random job identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Errors raised when a name cannot be used as a resource segment.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Name was empty or whitespace only.
    #[error("{kind} name must not be empty")]
    Empty {
        /// Segment kind label (for example `database`).
        kind: &'static str,
    },
    /// Name exceeded [`MAX_SEGMENT_BYTES`].
    #[error("{kind} name exceeds {max_bytes} bytes")]
    TooLong {
        /// Segment kind label.
        kind: &'static str,
        /// Maximum allowed bytes.
        max_bytes: usize,
    },
    /// Name contained a reserved or control character.
    #[error("{kind} name contains invalid character '{found}'")]
    InvalidCharacter {
        /// Segment kind label.
        kind: &'static str,
        /// Offending character.
        found: char,
    },
}

/// Validates that `value` can be used as a resource path segment.
///
/// # Errors
///
/// Returns [`IdentifierError`] when the name is empty, too long, or contains
/// path separators, query/fragment markers, or control characters.
pub fn validate_segment(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
    if value.trim().is_empty() {
        return Err(IdentifierError::Empty {
            kind,
        });
    }
    if value.len() > MAX_SEGMENT_BYTES {
        return Err(IdentifierError::TooLong {
            kind,
            max_bytes: MAX_SEGMENT_BYTES,
        });
    }
    if let Some(found) =
        value.chars().find(|ch| matches!(ch, '/' | '\\' | '?' | '#') || ch.is_control())
    {
        return Err(IdentifierError::InvalidCharacter {
            kind,
            found,
        });
    }
    Ok(())
}
