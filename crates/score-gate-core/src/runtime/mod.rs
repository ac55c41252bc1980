// crates/score-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Score Gate Runtime
// Description: Runtime decision logic for inbound execute requests.
// Purpose: Group the intake gate and its error taxonomy.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The runtime hosts the intake gate: body decoding plus the ordered
//! validation chain that runs before any engine call.

pub mod intake;

pub use intake::AcceptedInput;
pub use intake::INPUT_FIELD;
pub use intake::INTERNAL_FAULT_MESSAGE;
pub use intake::IntakeDecision;
pub use intake::IntakeFault;
pub use intake::ValidationError;
pub use intake::classify;
pub use intake::classify_owned;
pub use intake::decode_body;
pub use intake::validate_payload;
