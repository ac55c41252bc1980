// crates/score-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared fixtures for score-gate-config integration tests.
// =============================================================================

#![allow(dead_code, reason = "Shared helpers are not used by every test binary.")]

use score_gate_config::ConfigError;
use score_gate_config::ScoreGateConfig;

/// Parses and validates a config from TOML text.
pub fn config_from_toml(toml: &str) -> Result<ScoreGateConfig, ConfigError> {
    ScoreGateConfig::from_bytes(toml.as_bytes())
}

/// Returns a validated default config.
pub fn minimal_config() -> Result<ScoreGateConfig, ConfigError> {
    config_from_toml("")
}

/// Asserts that a result failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
