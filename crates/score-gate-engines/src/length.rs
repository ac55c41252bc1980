// crates/score-gate-engines/src/length.rs
// ============================================================================
// Module: Length Engine
// Description: Deterministic structured scorer based on input size.
// Purpose: Provide a runnable default engine with the full score shape.
// Dependencies: score-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Scores input by character count scaled into `[0, 100]` against a
//! saturation length. This is a placeholder for a real scoring model: it is
//! deterministic, linear in input size, and always produces a valid
//! [`ScoreResult`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use score_gate_core::EngineError;
use score_gate_core::ExecuteOutput;
use score_gate_core::Rationale;
use score_gate_core::ScoreResult;
use score_gate_core::ScoringEngine;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Highest score the engine reports.
const MAX_SCORE: f64 = 100.0;

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Length-based scoring engine.
///
/// # Invariants
/// - `saturation_chars` is non-zero.
#[derive(Debug, Clone, Copy)]
pub struct LengthEngine {
    /// Character count that earns the maximum score.
    saturation_chars: usize,
}

impl LengthEngine {
    /// Creates a length engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] when `saturation_chars` is zero.
    pub fn new(saturation_chars: usize) -> Result<Self, EngineError> {
        if saturation_chars == 0 {
            return Err(EngineError::Unavailable(
                "length engine saturation must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            saturation_chars,
        })
    }
}

impl ScoringEngine for LengthEngine {
    fn score(&self, input: &str) -> Result<ExecuteOutput, EngineError> {
        let characters = input.chars().count();
        let words = input.split_whitespace().count();
        let mut rationale = Rationale::default();
        if characters >= self.saturation_chars {
            rationale.positives.push("input reaches the saturation length".to_string());
        } else {
            rationale
                .negatives
                .push(format!("input is shorter than {} characters", self.saturation_chars));
        }
        if words > 1 {
            rationale.positives.push(format!("input contains {words} words"));
        } else if words == 0 {
            rationale.negatives.push("input contains no words".to_string());
        }
        Ok(ExecuteOutput::Score(ScoreResult {
            score: scaled_score(characters, self.saturation_chars),
            rationale,
            points: json!({
                "characters": characters,
                "words": words,
            }),
        }))
    }

    fn name(&self) -> &'static str {
        "length"
    }
}

/// Scales `characters` into `[0, MAX_SCORE]`, rounded to two decimals.
#[allow(clippy::cast_precision_loss, reason = "Scores only need two decimal places.")]
fn scaled_score(characters: usize, saturation: usize) -> f64 {
    let clamped = characters.min(saturation) as f64;
    let raw = clamped / saturation as f64 * MAX_SCORE;
    (raw * 100.0).round() / 100.0
}

// ============================================================================
// SECTION: Tests
// ============================================================================
