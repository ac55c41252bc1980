// crates/score-gate-engines/src/factory.rs
// ============================================================================
// Module: Engine Factory
// Description: Config-driven scoring engine construction.
// Dependencies: score-gate-config
// ============================================================================

//! ## Overview
//! Maps the `[engine]` config section onto a concrete engine wrapped in a
//! [`SharedScoringEngine`].

use score_gate_config::EngineConfig;
use score_gate_config::EngineType;
use score_gate_core::EngineError;
use score_gate_core::SharedScoringEngine;

use crate::echo::EchoEngine;
use crate::http::HttpEngine;
use crate::http::HttpEngineConfig;
use crate::length::LengthEngine;

/// Builds the configured scoring engine.
///
/// # Errors
///
/// Returns [`EngineError::Unavailable`] when the engine cannot be created.
pub fn build_engine(config: &EngineConfig) -> Result<SharedScoringEngine, EngineError> {
    match config.engine_type {
        EngineType::Length => {
            Ok(SharedScoringEngine::from_engine(LengthEngine::new(config.saturation_chars)?))
        }
        EngineType::Echo => Ok(SharedScoringEngine::from_engine(EchoEngine)),
        EngineType::Http => {
            let url = config
                .url
                .clone()
                .ok_or_else(|| EngineError::Unavailable("http engine requires url".to_string()))?;
            let engine = HttpEngine::new(HttpEngineConfig {
                url,
                allow_http: config.allow_http,
                timeout_ms: config.timeout_ms,
                max_response_bytes: config.max_response_bytes,
                ..HttpEngineConfig::default()
            })?;
            Ok(SharedScoringEngine::from_engine(engine))
        }
    }
}
