// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for Score Gate system-tests.
// Purpose: Provide gate harnesses, fixtures, and readiness checks.
// Dependencies: system-tests, score-gate-client, score-gate-server
// ============================================================================

//! ## Overview
//! Shared helpers for Score Gate system-tests.
//! Invariants:
//! - System-test execution is deterministic and fail-closed.
//! - A gate is spawned on loopback unless an external endpoint is configured.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod fixtures;
pub mod readiness;
pub mod timeouts;
