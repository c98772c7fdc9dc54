// system-tests/src/lib.rs
// ============================================================================
// Module: Lake Catalog System Tests Library
// Description: Shared configuration for catalog scenario system tests.
// Purpose: Provide typed environment settings for the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the scenario binaries in
//! `system-tests/tests`. The binaries run against an in-process stub service
//! by default; environment variables switch them to record, playback, or
//! live runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
