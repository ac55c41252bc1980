// crates/score-gate-core/src/lib.rs
// ============================================================================
// Module: Score Gate Core Library
// Description: Public API surface for the Score Gate core.
// Purpose: Expose the intake gate, execute envelope types, and engine interface.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Score Gate core decides, for every inbound execute request, whether the
//! payload is forwarded to a scoring engine or rejected with a fixed client
//! error. Classification is a pure, ordered decision chain with no shared
//! state. The scoring engine itself is an opaque collaborator reached through
//! [`ScoringEngine`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::EngineError;
pub use interfaces::ScoringEngine;
pub use interfaces::SharedScoringEngine;
pub use runtime::AcceptedInput;
pub use runtime::INPUT_FIELD;
pub use runtime::INTERNAL_FAULT_MESSAGE;
pub use runtime::IntakeDecision;
pub use runtime::IntakeFault;
pub use runtime::ValidationError;
pub use runtime::classify;
pub use runtime::classify_owned;
pub use runtime::decode_body;
pub use runtime::validate_payload;
