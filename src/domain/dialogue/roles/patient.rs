//! Patient generator.
//!
//! Produces the next patient message. Cases, in priority order:
//!
//! 1. first patient turn: greeting seeded with a cached initial symptom draw
//! 2. right after a body turn: fold the sensations into a reply to the doctor
//! 3. otherwise: free reply, whose ask-body marker decides the routing
//!
//! Only case 3 may route to the body; every other output is marker-stripped.

use std::sync::Arc;

use tracing::debug;

use super::prompts;
use super::referee::looks_like_diagnosis;
use crate::domain::dialogue::markers::{requests_body, strip_markers};
use crate::domain::dialogue::message::Sender;
use crate::domain::dialogue::session::Session;
use crate::domain::dialogue::symptom_cache::SymptomHintCache;
use crate::ports::{JudgeError, JudgeGateway, JudgeRequest, JudgeTask};

pub const GREETING_FALLBACK: &str = "医生您好，我最近身体不太舒服，想请您帮我看看。";
pub const REPLY_FALLBACK: &str = "医生，我能再详细说明一下我的症状吗？";
pub const AFTER_BODY_FALLBACK: &str =
    "医生，我最近感觉身体确实不太舒服，具体症状有点复杂，能否请您详细问诊？";
pub const REWRITE_FALLBACK: &str =
    "医生，我想再详细说明一下我的症状，我确实感到不舒服，但很难用专业术语描述。";
pub const SYMPTOM_HINT_FALLBACK: &str = "- 身体有些说不上来的不舒服";

/// Where the engine goes after a patient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientRoute {
    Body,
    SystemCheck,
}

/// A generated patient message and its routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDraft {
    pub content: String,
    pub route: PatientRoute,
}

impl PatientDraft {
    fn for_check(content: String) -> Self {
        Self {
            content,
            route: PatientRoute::SystemCheck,
        }
    }
}

pub struct PatientGenerator {
    gateway: Arc<dyn JudgeGateway>,
    hints: Arc<SymptomHintCache>,
}

impl PatientGenerator {
    pub fn new(gateway: Arc<dyn JudgeGateway>, hints: Arc<SymptomHintCache>) -> Self {
        Self { gateway, hints }
    }

    /// Generates the next patient message for the session.
    pub async fn generate(&self, session: &Session) -> Result<PatientDraft, JudgeError> {
        if session.count_from(Sender::Patient) == 0 {
            return self.greet(session).await;
        }
        if session.last_message().map(|m| m.sender) == Some(Sender::Body) {
            return self.reply_after_body(session).await;
        }
        self.reply(session).await
    }

    /// Rewrites the latest patient message the referee rejected.
    pub async fn rewrite(&self, session: &Session, reason: &str) -> Result<String, JudgeError> {
        let rejected = session
            .last_from(Sender::Patient)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let history = prompts::format_history(session.messages());
        let raw = self
            .call(
                session,
                JudgeTask::PatientRewrite,
                prompts::patient_rewrite_prompt(&history, rejected, reason),
            )
            .await?;
        Ok(non_blank_or(strip_markers(&raw), REWRITE_FALLBACK))
    }

    async fn greet(&self, session: &Session) -> Result<PatientDraft, JudgeError> {
        let hint = self.symptom_hint(session).await?;
        let raw = self
            .call(session, JudgeTask::PatientGreeting, prompts::greeting_prompt(&hint))
            .await?;
        Ok(PatientDraft::for_check(non_blank_or(
            strip_markers(&raw),
            GREETING_FALLBACK,
        )))
    }

    async fn reply_after_body(&self, session: &Session) -> Result<PatientDraft, JudgeError> {
        let sensations = session
            .last_from(Sender::Body)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let doctor_question = session
            .last_from(Sender::Doctor)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let raw = self
            .call(
                session,
                JudgeTask::PatientAfterBody,
                prompts::patient_after_body_prompt(sensations, doctor_question),
            )
            .await?;
        Ok(PatientDraft::for_check(non_blank_or(
            strip_markers(&raw),
            AFTER_BODY_FALLBACK,
        )))
    }

    async fn reply(&self, session: &Session) -> Result<PatientDraft, JudgeError> {
        let doctor_gave_diagnosis = session
            .last_from(Sender::Doctor)
            .map(|m| looks_like_diagnosis(&m.content, session.diagnosis()))
            .unwrap_or(false);
        let history = prompts::format_history(session.messages());
        let raw = self
            .call(
                session,
                JudgeTask::PatientReply,
                prompts::patient_reply_prompt(&history, doctor_gave_diagnosis),
            )
            .await?;

        if requests_body(&raw) {
            return Ok(PatientDraft {
                content: raw.trim().to_string(),
                route: PatientRoute::Body,
            });
        }
        Ok(PatientDraft::for_check(non_blank_or(
            strip_markers(&raw),
            REPLY_FALLBACK,
        )))
    }

    async fn symptom_hint(&self, session: &Session) -> Result<String, JudgeError> {
        if let Some(hint) = self.hints.get(session.id(), session.diagnosis()) {
            debug!(session_id = %session.id(), "Symptom hint cache hit");
            return Ok(hint);
        }
        let raw = self
            .call(
                session,
                JudgeTask::InitialSymptoms,
                prompts::initial_symptoms_prompt(session.diagnosis()),
            )
            .await?;
        let hint = strip_markers(&raw);
        if hint.is_empty() {
            return Ok(SYMPTOM_HINT_FALLBACK.to_string());
        }
        self.hints.insert(session.id(), session.diagnosis(), hint.clone());
        Ok(hint)
    }

    async fn call(
        &self,
        session: &Session,
        task: JudgeTask,
        prompt: String,
    ) -> Result<String, JudgeError> {
        self.gateway
            .invoke(JudgeRequest::new(task, prompt, prompts::PATIENT_CONTEXT).for_session(session.id()))
            .await
    }
}

fn non_blank_or(content: String, fallback: &str) -> String {
    if content.trim().is_empty() {
        fallback.to_string()
    } else {
        content
    }
}
