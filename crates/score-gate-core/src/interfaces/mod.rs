// crates/score-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Score Gate Interfaces
// Description: Backend-agnostic interface for scoring engines.
// Purpose: Define the seam between the intake gate and the opaque engine.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The gate never inspects how scores are produced. It hands validated input
//! to a [`ScoringEngine`] and maps any [`EngineError`] to a generic internal
//! fault. Engine error details are for audit logs only and must never be sent
//! to callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::ExecuteOutput;

// ============================================================================
// SECTION: Scoring Engine
// ============================================================================

/// Scoring engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine failed while scoring.
    #[error("scoring engine failed: {0}")]
    Failed(String),
    /// Engine could not be reached or is not ready.
    #[error("scoring engine unavailable: {0}")]
    Unavailable(String),
    /// Engine returned output that does not fit the execute contract.
    #[error("scoring engine returned invalid output: {0}")]
    InvalidOutput(String),
}

impl EngineError {
    /// Returns a stable label for audit and metrics classification.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Failed(_) => "engine_failed",
            Self::Unavailable(_) => "engine_unavailable",
            Self::InvalidOutput(_) => "engine_invalid_output",
        }
    }
}

/// Opaque scoring engine invoked only after validation succeeds.
///
/// Implementations are synchronous and may block; callers are responsible
/// for moving calls off async executors.
pub trait ScoringEngine: Send + Sync {
    /// Scores a validated, non-empty input.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when scoring fails for any reason.
    fn score(&self, input: &str) -> Result<ExecuteOutput, EngineError>;

    /// Returns a short engine name for logs.
    fn name(&self) -> &'static str;
}

/// Shared scoring engine backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedScoringEngine {
    /// Inner engine implementation.
    inner: Arc<dyn ScoringEngine>,
}

impl SharedScoringEngine {
    /// Wraps an engine in a shared, clonable wrapper.
    #[must_use]
    pub fn from_engine(engine: impl ScoringEngine + 'static) -> Self {
        Self {
            inner: Arc::new(engine),
        }
    }

    /// Wraps an existing shared engine.
    #[must_use]
    pub const fn new(engine: Arc<dyn ScoringEngine>) -> Self {
        Self {
            inner: engine,
        }
    }
}

impl ScoringEngine for SharedScoringEngine {
    fn score(&self, input: &str) -> Result<ExecuteOutput, EngineError> {
        self.inner.score(input)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
