// crates/score-gate-engines/src/echo.rs
// ============================================================================
// Module: Echo Engine
// Description: Scalar engine returning the input character count.
// ============================================================================

//! ## Overview
//! Produces a non-structured output, which exercises the scalar branch of
//! the execute contract.

use score_gate_core::EngineError;
use score_gate_core::ExecuteOutput;
use score_gate_core::ScoringEngine;
use serde_json::Value;

/// Engine whose output is the number of characters in the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoEngine;

impl ScoringEngine for EchoEngine {
    fn score(&self, input: &str) -> Result<ExecuteOutput, EngineError> {
        Ok(ExecuteOutput::Scalar(Value::from(input.chars().count())))
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}
