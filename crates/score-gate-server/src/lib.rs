// crates/score-gate-server/src/lib.rs
// ============================================================================
// Module: Score Gate Server Library
// Description: HTTP server, execute service, audit, and metrics hooks.
// Purpose: Expose `/api/execute` backed by the intake gate.
// Dependencies: score-gate-core, score-gate-config, score-gate-engines, axum, tokio
// ============================================================================

//! ## Overview
//! [`ExecuteService`] turns raw request bytes into a status and envelope by
//! running the intake gate and, for accepted input, the scoring engine.
//! [`GateServer`] wraps it in an axum HTTP server that enforces the body
//! limit, moves engine calls onto a blocking-capable context, and emits one
//! audit event and one metrics event per request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod server;
pub mod service;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::ExecuteAuditEvent;
pub use audit::ExecuteAuditEventParams;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use server::GateServer;
pub use server::PAYLOAD_TOO_LARGE_MESSAGE;
pub use server::ServerError;
pub use service::ExecuteOutcome;
pub use service::ExecuteReply;
pub use service::ExecuteService;
pub use telemetry::EXECUTE_LATENCY_BUCKETS_MS;
pub use telemetry::ExecuteMetricEvent;
pub use telemetry::ExecuteOutcomeLabel;
pub use telemetry::GateMetrics;
pub use telemetry::NoopMetrics;
