// crates/score-gate-core/src/runtime/intake.rs
// ============================================================================
// Module: Intake Gate
// Description: Ordered validation and error classification for execute requests.
// Purpose: Decide accept-and-forward vs. reject-with-reason before scoring.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The intake gate classifies a decoded payload with a fixed rule order. The
//! first matching rule wins, so a payload that violates several rules always
//! reports the earliest one:
//!
//! 1. top level is not an object: [`ValidationError::DataFormatInvalid`]
//! 2. `input` key absent: [`ValidationError::MissingInput`]
//! 3. `input` null or not a string: [`ValidationError::InputFormatInvalid`]
//! 4. `input` is the empty string: [`ValidationError::EmptyInput`]
//! 5. otherwise the input is accepted unchanged, with no size cap.
//!
//! Decoding failures (no body, undecodable bytes) are internal faults, not
//! client errors. Every function here is pure and safe to call concurrently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the required payload field.
pub const INPUT_FIELD: &str = "input";
/// Generic message returned for every internal fault.
pub const INTERNAL_FAULT_MESSAGE: &str = "Internal server issue";
/// HTTP status for client validation errors.
const CLIENT_ERROR_STATUS: u16 = 400;
/// HTTP status for internal faults.
const INTERNAL_FAULT_STATUS: u16 = 500;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client validation errors, reported as HTTP 400.
///
/// # Invariants
/// - Display strings are part of the wire contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// Top-level payload is not a JSON object.
    #[error("Data format request invalid")]
    DataFormatInvalid,
    /// Payload object has no `input` key.
    #[error("Missing requirement in requested object")]
    MissingInput,
    /// `input` is null or not a string.
    #[error("Format input invalid")]
    InputFormatInvalid,
    /// `input` is an empty string.
    #[error("No input provided")]
    EmptyInput,
}

impl ValidationError {
    /// Returns the exact client-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::DataFormatInvalid => "Data format request invalid",
            Self::MissingInput => "Missing requirement in requested object",
            Self::InputFormatInvalid => "Format input invalid",
            Self::EmptyInput => "No input provided",
        }
    }

    /// Returns the HTTP status code for validation errors.
    #[must_use]
    pub const fn status(self) -> u16 {
        CLIENT_ERROR_STATUS
    }

    /// Returns a stable label for audit and metrics classification.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::DataFormatInvalid => "data_format_invalid",
            Self::MissingInput => "missing_input",
            Self::InputFormatInvalid => "input_format_invalid",
            Self::EmptyInput => "empty_input",
        }
    }
}

/// Faults raised when a body cannot be decoded at all, reported as HTTP 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntakeFault {
    /// Request carried no body (or only whitespace).
    #[error("request body is empty")]
    EmptyBody,
    /// Request body is not valid UTF-8.
    #[error("request body is not valid utf-8")]
    Undecodable,
}

impl IntakeFault {
    /// Returns the generic client-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        INTERNAL_FAULT_MESSAGE
    }

    /// Returns the HTTP status code for internal faults.
    #[must_use]
    pub const fn status(self) -> u16 {
        INTERNAL_FAULT_STATUS
    }

    /// Returns a stable label for audit and metrics classification.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::EmptyBody => "empty_body",
            Self::Undecodable => "undecodable_body",
        }
    }
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Validated input ready for the scoring engine.
///
/// # Invariants
/// - The wrapped string is non-empty and identical to the request's `input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedInput(String);

impl AcceptedInput {
    /// Returns the input text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the input length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; accepted inputs are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the wrapper and returns the input text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Outcome of classifying a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeDecision {
    /// Forward the input to the scoring engine.
    Accept(AcceptedInput),
    /// Reject with a client validation error.
    Reject(ValidationError),
}

impl IntakeDecision {
    /// Returns true when the payload was accepted.
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }

    /// Converts the decision into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for rejected payloads.
    pub fn into_result(self) -> Result<AcceptedInput, ValidationError> {
        match self {
            Self::Accept(input) => Ok(input),
            Self::Reject(err) => Err(err),
        }
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes raw request bytes into a JSON value.
///
/// Non-empty UTF-8 text that is not JSON is returned as a JSON string so that
/// bare-text bodies are rejected by the data-format rule.
///
/// # Errors
///
/// Returns [`IntakeFault`] when the body is empty or not UTF-8.
pub fn decode_body(bytes: &[u8]) -> Result<Value, IntakeFault> {
    let text = std::str::from_utf8(bytes).map_err(|_| IntakeFault::Undecodable)?;
    if text.trim().is_empty() {
        return Err(IntakeFault::EmptyBody);
    }
    Ok(serde_json::from_str::<Value>(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Runs the ordered validation chain and borrows the accepted input.
///
/// # Errors
///
/// Returns the first [`ValidationError`] that matches.
pub fn validate_payload(payload: &Value) -> Result<&str, ValidationError> {
    let Value::Object(map) = payload else {
        return Err(ValidationError::DataFormatInvalid);
    };
    let Some(input) = map.get(INPUT_FIELD) else {
        return Err(ValidationError::MissingInput);
    };
    let Value::String(input) = input else {
        return Err(ValidationError::InputFormatInvalid);
    };
    if input.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(input.as_str())
}

/// Classifies a borrowed payload, copying the accepted input.
#[must_use]
pub fn classify(payload: &Value) -> IntakeDecision {
    match validate_payload(payload) {
        Ok(input) => IntakeDecision::Accept(AcceptedInput(input.to_string())),
        Err(err) => IntakeDecision::Reject(err),
    }
}

/// Classifies an owned payload, moving the accepted input out without a copy.
#[must_use]
pub fn classify_owned(payload: Value) -> IntakeDecision {
    if let Err(err) = validate_payload(&payload) {
        return IntakeDecision::Reject(err);
    }
    match payload {
        Value::Object(mut map) => match map.remove(INPUT_FIELD) {
            Some(Value::String(input)) => IntakeDecision::Accept(AcceptedInput(input)),
            _ => IntakeDecision::Reject(ValidationError::InputFormatInvalid),
        },
        _ => IntakeDecision::Reject(ValidationError::DataFormatInvalid),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
