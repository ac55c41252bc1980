// crates/score-gate-engines/src/lib.rs
// ============================================================================
// Module: Score Gate Engines
// Description: Built-in scoring engines and engine selection.
// Purpose: Provide the engines the gate forwards validated input to.
// Dependencies: score-gate-core, score-gate-config, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The gate treats scoring as opaque. This crate ships two deterministic
//! in-process engines (`length`, `echo`) and an `http` engine that forwards
//! input to an external scoring service with strict limits. [`build_engine`]
//! selects one from configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod echo;
pub mod factory;
pub mod http;
pub mod length;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use echo::EchoEngine;
pub use factory::build_engine;
pub use http::HttpEngine;
pub use http::HttpEngineConfig;
pub use length::LengthEngine;
