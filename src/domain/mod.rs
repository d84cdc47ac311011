//! Domain layer containing game logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `dialogue` - Sessions, role generators, verdict parsing and the dialogue engine

pub mod dialogue;
pub mod foundation;
