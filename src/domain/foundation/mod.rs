//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, error vocabulary and the state machine trait
//! used throughout the dialogue domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::SessionId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
