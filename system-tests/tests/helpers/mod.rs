// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for lake catalog system-tests.
// Purpose: Provide the stub service, scenario harness, fixtures, and artifact utilities.
// Dependencies: system-tests, lake-catalog-client, lake-catalog-core
// ============================================================================

//! ## Overview
//! Shared helpers for lake catalog system-tests.
//! Invariants:
//! - Scenario bodies run unchanged in stub, record, playback, and live modes.
//! - Generated names come from the session context so playback is deterministic.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod catalog_state;
pub mod scenarios;
