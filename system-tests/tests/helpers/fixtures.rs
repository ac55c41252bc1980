// system-tests/tests/helpers/fixtures.rs
// ============================================================================
// Module: Contract Fixtures
// Description: Table-driven execute cases loaded from `fixtures/*.json`.
// Purpose: Keep request/expectation pairs in data rather than code.
// Dependencies: score-gate-client, serde, serde_json
// ============================================================================

use std::path::PathBuf;

use score_gate_client::ExecuteResponse;
use serde::Deserialize;
use serde_json::Value;

/// Fixture file holding the contract cases for the default length engine.
const CASES_FILE: &str = "fixtures/cases.json";
/// Fixture file holding cases for a gate configured with the echo engine.
const ECHO_CASES_FILE: &str = "fixtures/echo_cases.json";

/// Request body sent for a case.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaseRequest {
    /// Body serialized from a JSON value.
    Json {
        /// JSON body.
        body: Value,
    },
    /// Raw text body sent as-is.
    Text {
        /// Text body.
        body: String,
    },
    /// No body at all.
    Empty,
}

impl CaseRequest {
    /// Returns the raw bytes to send, or `None` for no body.
    pub fn body_bytes(&self) -> Result<Option<Vec<u8>>, String> {
        match self {
            Self::Json {
                body,
            } => serde_json::to_vec(body).map(Some).map_err(|err| err.to_string()),
            Self::Text {
                body,
            } => Ok(Some(body.as_bytes().to_vec())),
            Self::Empty => Ok(None),
        }
    }
}

/// Expected output shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputExpectation {
    /// Output is a structured score with rationale and points.
    Score,
    /// Output is exactly this non-object value.
    Scalar(Value),
    /// Output is null.
    Absent,
}

impl OutputExpectation {
    /// Checks the `output` member of a response body.
    pub fn check(&self, body: &Value) -> Result<(), String> {
        let output = body.get("output").ok_or_else(|| format!("missing output key in {body}"))?;
        match self {
            Self::Score => check_score_shape(output),
            Self::Scalar(expected) if output == expected => Ok(()),
            Self::Scalar(expected) => Err(format!("expected output {expected}, got {output}")),
            Self::Absent if output.is_null() => Ok(()),
            Self::Absent => Err(format!("expected null output, got {output}")),
        }
    }
}

/// Expected response for a case.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseExpectation {
    /// HTTP status.
    pub status: u16,
    /// Output shape.
    pub output: OutputExpectation,
    /// Exact `error.message`, or `None` when `error` must be null.
    pub error: Option<String>,
}

/// Single table-driven contract case.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractCase {
    /// Case name used in failure reports.
    pub name: String,
    /// Request to send.
    pub request: CaseRequest,
    /// Expected response.
    pub expected: CaseExpectation,
}

impl ContractCase {
    /// Compares a response with the expectation, naming the case on mismatch.
    pub fn check(&self, response: &ExecuteResponse) -> Result<(), String> {
        if response.status != self.expected.status {
            return Err(format!(
                "{}: status {} != {}",
                self.name, response.status, self.expected.status
            ));
        }
        if response.error_message() != self.expected.error.as_deref() {
            return Err(format!("{}: error mismatch in {}", self.name, response.body));
        }
        self.expected.output.check(&response.body).map_err(|err| format!("{}: {err}", self.name))
    }
}

/// Loads the length-engine contract cases.
pub fn load_cases() -> Result<Vec<ContractCase>, String> {
    load_case_file(CASES_FILE)
}

/// Loads the echo-engine cases.
pub fn load_echo_cases() -> Result<Vec<ContractCase>, String> {
    load_case_file(ECHO_CASES_FILE)
}

/// Reads and parses one fixture file relative to the crate root.
fn load_case_file(name: &str) -> Result<Vec<ContractCase>, String> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name);
    let bytes =
        std::fs::read(&path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    serde_json::from_slice(&bytes).map_err(|err| format!("invalid {}: {err}", path.display()))
}

/// Checks that `output` is a structured score.
pub fn check_score_shape(output: &Value) -> Result<(), String> {
    for pointer in ["/score", "/rationale/positives", "/rationale/negatives", "/points"] {
        if output.pointer(pointer).is_none() {
            return Err(format!("score output missing {pointer}: {output}"));
        }
    }
    if !output["score"].is_number() {
        return Err(format!("score must be numeric: {output}"));
    }
    Ok(())
}
