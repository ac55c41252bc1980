// crates/score-gate-core/src/core/envelope.rs
// ============================================================================
// Module: Execute Envelope
// Description: Response envelope and scoring output types for `/api/execute`.
// Purpose: Give success and failure responses one stable JSON shape.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every response carries both an `output` and an `error` key. Exactly one of
//! them is non-null. Outputs are either a structured [`ScoreResult`] or a raw
//! scalar value, depending on the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Positive and negative findings behind a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rationale {
    /// Findings that raised the score.
    pub positives: Vec<String>,
    /// Findings that lowered the score.
    pub negatives: Vec<String>,
}

/// Structured scoring result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Numeric score.
    pub score: f64,
    /// Explanation of the score.
    pub rationale: Rationale,
    /// Engine-defined point breakdown.
    pub points: Value,
}

/// Output returned by a scoring engine.
///
/// # Invariants
/// - `Scalar` never holds a JSON object; objects must parse as [`ScoreResult`].
/// - Deserialization goes through [`ExecuteOutput::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "Value")]
pub enum ExecuteOutput {
    /// Structured score with rationale and points.
    Score(ScoreResult),
    /// Raw scalar (or array) output.
    Scalar(Value),
}

/// Output shape violations reported when converting untrusted JSON.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputShapeError {
    /// Object output that does not match the score result shape.
    #[error("object output is not a valid score result: {0}")]
    InvalidScore(String),
    /// Null output, which is indistinguishable from a failed response.
    #[error("output must not be null")]
    Null,
}

impl ExecuteOutput {
    /// Converts an untrusted JSON value into an execute output.
    ///
    /// # Errors
    ///
    /// Returns [`OutputShapeError`] when the value is null or an object that
    /// is not a valid [`ScoreResult`].
    pub fn from_value(value: Value) -> Result<Self, OutputShapeError> {
        match value {
            Value::Null => Err(OutputShapeError::Null),
            Value::Object(_) => serde_json::from_value::<ScoreResult>(value)
                .map(Self::Score)
                .map_err(|err| OutputShapeError::InvalidScore(err.to_string())),
            other => Ok(Self::Scalar(other)),
        }
    }

    /// Returns true when the output is a structured score.
    #[must_use]
    pub const fn is_score(&self) -> bool {
        matches!(self, Self::Score(_))
    }
}

impl TryFrom<Value> for ExecuteOutput {
    type Error = OutputShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Error payload attached to non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub message: String,
}

/// Response envelope for `/api/execute`.
///
/// # Invariants
/// - Exactly one of `output` and `error` is `Some`.
/// - Both keys are always serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteEnvelope {
    /// Engine output on success.
    #[serde(default)]
    pub output: Option<ExecuteOutput>,
    /// Error payload on failure.
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

impl ExecuteEnvelope {
    /// Builds a success envelope.
    #[must_use]
    pub const fn success(output: ExecuteOutput) -> Self {
        Self {
            output: Some(output),
            error: None,
        }
    }

    /// Builds a failure envelope with the given message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            output: None,
            error: Some(ErrorBody {
                message: message.into(),
            }),
        }
    }

    /// Returns the error message when the envelope is a failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|error| error.message.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
