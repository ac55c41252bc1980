// crates/score-gate-server/src/service.rs
// ============================================================================
// Module: Execute Service
// Description: Transport-independent handling of execute requests.
// Purpose: Map raw request bytes to a status, envelope, and outcome.
// Dependencies: score-gate-core
// ============================================================================

//! ## Overview
//! The service runs decode, classify, and score in that order and stops at
//! the first failure. Validation errors carry their exact message and never
//! reach the engine. Decode and engine faults collapse to the generic
//! internal message; their detail stays in [`ExecuteOutcome`] for audit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use score_gate_core::ExecuteEnvelope;
use score_gate_core::ExecuteOutput;
use score_gate_core::INTERNAL_FAULT_MESSAGE;
use score_gate_core::IntakeDecision;
use score_gate_core::ScoringEngine;
use score_gate_core::SharedScoringEngine;
use score_gate_core::ValidationError;
use score_gate_core::classify_owned;
use score_gate_core::decode_body;

use crate::telemetry::ExecuteOutcomeLabel;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// HTTP status for accepted requests.
const STATUS_OK: u16 = 200;
/// HTTP status for internal faults.
const STATUS_INTERNAL: u16 = 500;
/// HTTP status for bodies above the transport limit.
const STATUS_PAYLOAD_TOO_LARGE: u16 = 413;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Classification of a handled request for audit and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Input accepted and scored.
    Accepted,
    /// Input rejected by the intake gate.
    Rejected(ValidationError),
    /// Internal fault; `detail` is never sent to the caller.
    InternalFault {
        /// Stable fault label.
        kind: &'static str,
        /// Internal fault description.
        detail: String,
    },
    /// Body exceeded the transport limit.
    PayloadTooLarge,
}

impl ExecuteOutcome {
    /// Returns the telemetry label for the outcome.
    #[must_use]
    pub const fn label(&self) -> ExecuteOutcomeLabel {
        match self {
            Self::Accepted => ExecuteOutcomeLabel::Accepted,
            Self::Rejected(_) => ExecuteOutcomeLabel::Rejected,
            Self::InternalFault {
                ..
            } => ExecuteOutcomeLabel::InternalFault,
            Self::PayloadTooLarge => ExecuteOutcomeLabel::PayloadTooLarge,
        }
    }

    /// Returns the error kind label, if any.
    #[must_use]
    pub const fn error_kind(&self) -> Option<&'static str> {
        match self {
            Self::Accepted => None,
            Self::Rejected(err) => Some(err.kind()),
            Self::InternalFault {
                kind, ..
            } => Some(*kind),
            Self::PayloadTooLarge => Some("payload_too_large"),
        }
    }

    /// Returns internal fault detail, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::InternalFault {
                detail, ..
            } => Some(detail.as_str()),
            _ => None,
        }
    }
}

/// Result of handling one execute request.
///
/// # Invariants
/// - `status` is 200 exactly when `envelope.output` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteReply {
    /// HTTP status code.
    pub status: u16,
    /// Response envelope.
    pub envelope: ExecuteEnvelope,
    /// Outcome classification.
    pub outcome: ExecuteOutcome,
}

impl ExecuteReply {
    /// Builds a 200 reply carrying engine output.
    #[must_use]
    pub const fn accepted(output: ExecuteOutput) -> Self {
        Self {
            status: STATUS_OK,
            envelope: ExecuteEnvelope::success(output),
            outcome: ExecuteOutcome::Accepted,
        }
    }

    /// Builds a 400 reply for a validation error.
    #[must_use]
    pub fn rejected(err: ValidationError) -> Self {
        Self {
            status: err.status(),
            envelope: ExecuteEnvelope::failure(err.message()),
            outcome: ExecuteOutcome::Rejected(err),
        }
    }

    /// Builds a 500 reply with the generic message.
    #[must_use]
    pub fn internal_fault(kind: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status: STATUS_INTERNAL,
            envelope: ExecuteEnvelope::failure(INTERNAL_FAULT_MESSAGE),
            outcome: ExecuteOutcome::InternalFault {
                kind,
                detail: detail.into(),
            },
        }
    }

    /// Builds a 413 reply for bodies above the transport limit.
    #[must_use]
    pub fn payload_too_large(message: &str) -> Self {
        Self {
            status: STATUS_PAYLOAD_TOO_LARGE,
            envelope: ExecuteEnvelope::failure(message),
            outcome: ExecuteOutcome::PayloadTooLarge,
        }
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Execute request handler shared by all transports.
#[derive(Clone)]
pub struct ExecuteService {
    /// Engine that scores accepted input.
    engine: SharedScoringEngine,
}

impl ExecuteService {
    /// Creates a service backed by the given engine.
    #[must_use]
    pub const fn new(engine: SharedScoringEngine) -> Self {
        Self {
            engine,
        }
    }

    /// Returns the engine name for logs.
    #[must_use]
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Handles one raw request body.
    ///
    /// May block for as long as the engine does.
    #[must_use]
    pub fn execute(&self, body: &[u8]) -> ExecuteReply {
        let payload = match decode_body(body) {
            Ok(payload) => payload,
            Err(fault) => return ExecuteReply::internal_fault(fault.kind(), fault.to_string()),
        };
        let input = match classify_owned(payload) {
            IntakeDecision::Accept(input) => input,
            IntakeDecision::Reject(err) => return ExecuteReply::rejected(err),
        };
        match self.engine.score(input.as_str()) {
            Ok(output) => ExecuteReply::accepted(output),
            Err(err) => ExecuteReply::internal_fault(err.kind(), err.to_string()),
        }
    }
}
