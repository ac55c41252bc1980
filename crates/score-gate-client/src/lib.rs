// crates/score-gate-client/src/lib.rs
// ============================================================================
// Module: Score Gate Client
// Description: HTTP client for the execute endpoint.
// Purpose: Separate HTTP outcomes from connection-level faults.
// Dependencies: score-gate-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! [`ExecuteClient`] posts to `/api/execute/`. Any HTTP response, including
//! 4xx and 5xx, is returned as an [`ExecuteResponse`]. Only failures that
//! produce no HTTP response at all (DNS, refused connection, timeout) become
//! [`ClientError::Connection`], whose code is `"Connection issue"`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::CONNECTION_ISSUE_CODE;
pub use client::ClientError;
pub use client::ExecuteClient;
pub use client::ExecuteResponse;
pub use client::RESPONSE_BODY_CODE;
