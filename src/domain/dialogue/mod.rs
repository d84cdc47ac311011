//! Dialogue domain module.
//!
//! The diagnostic game: a human doctor interviews an LLM-played patient whose
//! body answers private sub-queries, while an LLM referee checks patient
//! messages and adjudicates diagnoses.

mod catalog;
mod engine;
mod errors;
pub mod markers;
mod message;
mod phase;
pub mod roles;
mod session;
mod stats;
mod symptom_cache;
pub mod verdict;
mod view;

pub use catalog::{DiagnosisPicker, FixedDiagnosisPicker, RandomDiagnosisPicker};
pub use engine::{
    congratulation_message, turn_limit_message, DialogueEngine, DialoguePolicy, Resolution,
    TurnOutcome, BLANK_PATIENT_FALLBACK,
};
pub use errors::GameError;
pub use message::{Message, Sender};
pub use phase::DialoguePhase;
pub use session::{Session, OPENING_MESSAGE};
pub use stats::DiagnosisStat;
pub use symptom_cache::SymptomHintCache;
pub use verdict::{parse_verdict, VerdictKind};
pub use view::{GameSummary, SessionView};
