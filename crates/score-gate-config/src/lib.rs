// crates/score-gate-config/src/lib.rs
// ============================================================================
// Module: Score Gate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for score-gate.toml semantics.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! `score-gate-config` defines the canonical configuration model for the
//! Score Gate server. Validation is strict and fails closed: a config that
//! parses but violates a limit is rejected before the server starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
