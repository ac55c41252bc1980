// crates/score-gate-core/src/core/mod.rs
// ============================================================================
// Module: Score Gate Core Types
// Description: Data model shared by the gate, engines, server, and client.
// Purpose: Group the execute envelope and output types.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types describe what crosses the `/api/execute` boundary: the output
//! produced by a scoring engine and the envelope returned to callers.

pub mod envelope;

pub use envelope::ErrorBody;
pub use envelope::ExecuteEnvelope;
pub use envelope::ExecuteOutput;
pub use envelope::OutputShapeError;
pub use envelope::Rationale;
pub use envelope::ScoreResult;
