// crates/lake-catalog-client/src/lib.rs
// ============================================================================
// Module: Lake Catalog Client Library
// Description: Typed catalog and job clients over a pluggable transport.
// Purpose: Expose the management API client and its record/playback tooling.
// Dependencies: lake-catalog-core, reqwest, serde, toml, tracing, url, uuid
// ============================================================================

//! ## Overview
//! The client crate turns typed catalog operations into HTTP requests and
//! typed responses. Requests flow through a [`Transport`]: live HTTP, a
//! recorder wrapping live HTTP, or a playback store. [`MockContext`] selects
//! the transport for a test session.
//! Invariants:
//! - Calls are blocking and sequential; there is no retry or caching layer.
//! - Non-2xx responses always surface as [`ClientError`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod jobs;
pub mod mock;
mod request;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::CatalogClient;
pub use config::ClientConfig;
pub use config::ConfigError;
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use error::ServiceFailure;
pub use error::TransportError;
pub use jobs::JobClient;
pub use jobs::PollPolicy;
pub use mock::MockContext;
pub use mock::MockMode;
pub use transport::HttpRequest;
pub use transport::HttpResponse;
pub use transport::Method;
pub use transport::Transport;
pub use transport::http::HttpTransport;
pub use transport::http::HttpTransportConfig;
pub use transport::playback::PlaybackTransport;
pub use transport::recording::RecordedExchange;
pub use transport::recording::Recording;
pub use transport::recording::RecordingTransport;
