// crates/lake-catalog-core/src/query.rs
// ============================================================================
// Module: List Options
// Description: OData query options accepted by catalog list operations.
// Purpose: Carry filter, paging, ordering, and projection options to the wire.
// Dependencies: crate::filter
// ============================================================================

//! ## Overview
//! [`ListOptions`] is a small builder that renders to OData query pairs.
//! Unset options are omitted from the request entirely.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::filter::Filter;

// ============================================================================
// SECTION: List Options
// ============================================================================

/// OData options for a list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Server-side filter, re-applied locally on the results.
    pub filter: Option<Filter>,
    /// Maximum number of items to return across all pages.
    pub top: Option<u32>,
    /// Number of items to skip on the server.
    pub skip: Option<u32>,
    /// Ordering clause, for example `tableName desc`.
    pub orderby: Option<String>,
    /// Projection clause, for example `tableName,version`.
    pub select: Option<String>,
    /// Requests an inline item count.
    pub count: Option<bool>,
}

impl ListOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the maximum item count.
    #[must_use]
    pub const fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Sets the server-side skip count.
    #[must_use]
    pub const fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sets the ordering clause.
    #[must_use]
    pub fn orderby(mut self, orderby: impl Into<String>) -> Self {
        self.orderby = Some(orderby.into());
        self
    }

    /// Sets the projection clause.
    #[must_use]
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Requests an inline count.
    #[must_use]
    pub const fn count(mut self, count: bool) -> Self {
        self.count = Some(count);
        self
    }

    /// Renders the options as OData query pairs in a stable order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = &self.filter {
            pairs.push(("$filter", filter.to_string()));
        }
        if let Some(top) = self.top {
            pairs.push(("$top", top.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("$skip", skip.to_string()));
        }
        if let Some(orderby) = &self.orderby {
            pairs.push(("$orderby", orderby.clone()));
        }
        if let Some(select) = &self.select {
            pairs.push(("$select", select.clone()));
        }
        if let Some(count) = self.count {
            pairs.push(("$count", count.to_string()));
        }
        pairs
    }
}
