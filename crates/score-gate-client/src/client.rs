// crates/score-gate-client/src/client.rs
// ============================================================================
// Module: Execute Client
// Description: Async reqwest client for `/api/execute`.
// Purpose: Issue execute requests and classify transport faults.
// Dependencies: score-gate-core, reqwest, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A response is returned whenever a status line arrives, whatever the
//! status. Failures before that point are [`ClientError::Connection`].
//! A body that breaks off after the status is [`ClientError::Body`], which
//! keeps the status so callers never mistake it for an unreachable host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use score_gate_core::ExecuteEnvelope;
use score_gate_core::INPUT_FIELD;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Error code reported for connection-level faults.
pub const CONNECTION_ISSUE_CODE: &str = "Connection issue";
/// Error code reported when a response body breaks off.
pub const RESPONSE_BODY_CODE: &str = "Response body issue";
/// Error code reported for malformed endpoints.
const INVALID_ENDPOINT_CODE: &str = "Invalid endpoint";
/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Types
// ============================================================================

/// HTTP response from the execute endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as JSON; non-JSON bodies become a JSON string.
    pub body: Value,
}

impl ExecuteResponse {
    /// Returns true for 2xx responses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parses the body as an execute envelope.
    #[must_use]
    pub fn envelope(&self) -> Option<ExecuteEnvelope> {
        serde_json::from_value(self.body.clone()).ok()
    }

    /// Returns `error.message` when present.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error")?.get("message")?.as_str()
    }

    /// Returns `output` when present and non-null.
    #[must_use]
    pub fn output(&self) -> Option<&Value> {
        self.body.get("output").filter(|value| !value.is_null())
    }
}

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No HTTP response was obtained.
    #[error("Connection issue: {0}")]
    Connection(String),
    /// Status line received, but the body could not be read.
    #[error("response body error (status {status}): {message}")]
    Body {
        /// HTTP status already received.
        status: u16,
        /// Read failure description.
        message: String,
    },
    /// Endpoint could not be parsed or the client could not be built.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ClientError {
    /// Returns the stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => CONNECTION_ISSUE_CODE,
            Self::Body {
                ..
            } => RESPONSE_BODY_CODE,
            Self::InvalidEndpoint(_) => INVALID_ENDPOINT_CODE,
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Client for a single execute endpoint.
#[derive(Debug, Clone)]
pub struct ExecuteClient {
    /// Execute endpoint URL.
    endpoint: Url,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl ExecuteClient {
    /// Creates a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the URL is malformed.
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the URL is malformed or
    /// the HTTP client cannot be built.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|err| ClientError::InvalidEndpoint(err.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::InvalidEndpoint("scheme must be http or https".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("score-gate-client/0.1")
            .build()
            .map_err(|err| ClientError::InvalidEndpoint(err.to_string()))?;
        Ok(Self {
            endpoint,
            client,
        })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts `{"input": input}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] when no response is received.
    pub async fn execute_input(&self, input: &str) -> Result<ExecuteResponse, ClientError> {
        let mut payload = Map::new();
        payload.insert(INPUT_FIELD.to_string(), Value::String(input.to_string()));
        self.execute_json(&Value::Object(payload)).await
    }

    /// Posts an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] when no response is received.
    pub async fn execute_json(&self, payload: &Value) -> Result<ExecuteResponse, ClientError> {
        let body = serde_json::to_vec(payload)
            .map_err(|err| ClientError::InvalidEndpoint(format!("payload encoding: {err}")))?;
        self.execute_raw(Some(body)).await
    }

    /// Posts raw bytes, or no body at all when `body` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] when no response is received and
    /// [`ClientError::Body`] when the body breaks off after the status.
    pub async fn execute_raw(&self, body: Option<Vec<u8>>) -> Result<ExecuteResponse, ClientError> {
        let mut request =
            self.client.post(self.endpoint.clone()).header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body);
        }
        let response =
            request.send().await.map_err(|err| ClientError::Connection(err.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|err| ClientError::Body {
            status,
            message: err.to_string(),
        })?;
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Ok(ExecuteResponse {
            status,
            body,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
