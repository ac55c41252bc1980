// system-tests/src/lib.rs
// ============================================================================
// Module: Score Gate System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common settings for Score Gate system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the Score Gate system-tests
//! binaries in `system-tests/tests`. Suites either spawn a gate on loopback or
//! target an external deployment named by the environment.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
