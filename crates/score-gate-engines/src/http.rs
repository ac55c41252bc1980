// crates/score-gate-engines/src/http.rs
// ============================================================================
// Module: HTTP Engine
// Description: Scoring engine backed by an external HTTP service.
// Purpose: Forward validated input to a remote scorer with strict limits.
// Dependencies: score-gate-config, score-gate-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The HTTP engine POSTs `{"input": <text>}` to a fixed URL and accepts
//! either `{"output": <value>}` or a bare output value in response. It
//! enforces scheme restrictions, rejects URL credentials, disables
//! redirects, and bounds response size. Every transport, status, size, or
//! decode failure is an [`EngineError`]; none of it reaches callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use score_gate_config::parse_engine_url;
use score_gate_core::EngineError;
use score_gate_core::ExecuteOutput;
use score_gate_core::INPUT_FIELD;
use score_gate_core::ScoringEngine;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Response field that wraps the engine output.
const OUTPUT_FIELD: &str = "output";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP engine.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` URLs.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpEngineConfig {
    /// Engine endpoint.
    pub url: String,
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpEngineConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            allow_http: false,
            timeout_ms: 10_000,
            max_response_bytes: 1024 * 1024,
            user_agent: "score-gate/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Engine Implementation
// ============================================================================

/// Scoring engine that delegates to an external HTTP service.
///
/// # Invariants
/// - Redirects are not followed.
/// - Responses exceeding configured limits fail closed.
pub struct HttpEngine {
    /// Parsed, policy-checked endpoint.
    url: Url,
    /// Engine configuration, including limits.
    config: HttpEngineConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpEngine {
    /// Creates a new HTTP engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] when the URL is rejected or the
    /// HTTP client cannot be created.
    pub fn new(config: HttpEngineConfig) -> Result<Self, EngineError> {
        let url = parse_engine_url(&config.url, config.allow_http)
            .map_err(|err| EngineError::Unavailable(err.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| EngineError::Unavailable("http client build failed".to_string()))?;
        Ok(Self {
            url,
            config,
            client,
        })
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Sends the scoring request and returns the raw response.
    fn send(&self, input: &str) -> Result<Response, EngineError> {
        let mut payload = Map::new();
        payload.insert(INPUT_FIELD.to_string(), Value::String(input.to_string()));
        let body = serde_json::to_vec(&Value::Object(payload))
            .map_err(|err| EngineError::Failed(format!("request encoding failed: {err}")))?;
        let response = self
            .client
            .post(self.url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    EngineError::Unavailable("engine request timed out".to_string())
                } else {
                    EngineError::Unavailable("engine request failed".to_string())
                }
            })?;
        if response.url() != &self.url {
            return Err(EngineError::Failed("engine redirect not allowed".to_string()));
        }
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Failed(format!("engine returned status {}", status.as_u16())));
        }
        Ok(response)
    }
}

impl ScoringEngine for HttpEngine {
    fn score(&self, input: &str) -> Result<ExecuteOutput, EngineError> {
        let mut response = self.send(input)?;
        let body = read_response_limited(&mut response, self.config.max_response_bytes)?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|_| EngineError::InvalidOutput("engine response is not json".to_string()))?;
        ExecuteOutput::from_value(unwrap_output(value))
            .map_err(|err| EngineError::InvalidOutput(err.to_string()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Unwraps a single-key `{"output": ...}` wrapper; other values pass through.
fn unwrap_output(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(OUTPUT_FIELD) => {
            map.remove(OUTPUT_FIELD).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, EngineError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| EngineError::Failed("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(EngineError::Failed("engine response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let mut handle = response.take(max_bytes_u64.saturating_add(1));
    handle
        .read_to_end(&mut buf)
        .map_err(|_| EngineError::Failed("failed to read engine response".to_string()))?;
    if buf.len() > max_bytes {
        return Err(EngineError::Failed("engine response exceeds size limit".to_string()));
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected)
            .map_err(|_| EngineError::Failed("invalid response length".to_string()))?;
        if buf.len() < expected {
            return Err(EngineError::Failed("engine response truncated".to_string()));
        }
    }
    Ok(buf)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
