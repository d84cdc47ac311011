//! Role generators: patient, body and referee.
//!
//! Each builds a prompt from a read-only session, calls the judge gateway and
//! post-processes the reply. None of them mutate the session.

mod body;
mod patient;
pub mod prompts;
mod referee;

pub use body::{BodyOracle, BODY_FALLBACK};
pub use patient::{
    PatientDraft, PatientGenerator, PatientRoute, AFTER_BODY_FALLBACK, GREETING_FALLBACK,
    REPLY_FALLBACK, REWRITE_FALLBACK, SYMPTOM_HINT_FALLBACK,
};
pub use referee::{looks_like_diagnosis, Judgment, SystemReferee, DIAGNOSIS_INTENT_KEYWORDS};
