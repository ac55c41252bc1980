// crates/score-gate-server/src/telemetry.rs
// ============================================================================
// Module: Gate Telemetry
// Description: Observability hooks for execute requests.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A thin metrics interface for execute request counters and latency
//! histograms. Deployments plug in their own exporter by implementing
//! [`GateMetrics`]. Labels never carry request input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for execute request histograms.
pub const EXECUTE_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Execute request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteOutcomeLabel {
    /// Input accepted and scored.
    Accepted,
    /// Client validation error.
    Rejected,
    /// Internal fault (undecodable body or engine failure).
    InternalFault,
    /// Body exceeded the transport limit.
    PayloadTooLarge,
}

impl ExecuteOutcomeLabel {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::InternalFault => "internal_fault",
            Self::PayloadTooLarge => "payload_too_large",
        }
    }
}

/// Execute request metric event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteMetricEvent {
    /// Request outcome.
    pub outcome: ExecuteOutcomeLabel,
    /// HTTP status returned.
    pub status: u16,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for execute requests and latencies.
pub trait GateMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: ExecuteMetricEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: ExecuteMetricEvent, latency: Duration);
}

/// No-op metrics sink.
pub struct NoopMetrics;

impl GateMetrics for NoopMetrics {
    fn record_request(&self, _event: ExecuteMetricEvent) {}

    fn record_latency(&self, _event: ExecuteMetricEvent, _latency: Duration) {}
}
