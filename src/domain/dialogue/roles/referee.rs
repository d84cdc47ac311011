//! System referee.
//!
//! Two independent judgments, each requested as free text and reduced by the
//! verdict parser: patient plausibility and doctor diagnosis correctness.

use std::sync::Arc;

use tracing::debug;

use super::prompts;
use crate::domain::dialogue::message::Sender;
use crate::domain::dialogue::session::Session;
use crate::domain::dialogue::verdict::{evaluate, VerdictKind, VerdictRule};
use crate::ports::{JudgeError, JudgeGateway, JudgeRequest, JudgeTask};

/// Phrases a doctor uses when committing to a diagnosis.
pub const DIAGNOSIS_INTENT_KEYWORDS: &[&str] = &[
    "诊断", "判断", "认为", "确定", "可能是", "应该是", "我觉得是", "你有", "你患了", "患有",
];

/// Cheap pre-filter: does the text look like a diagnosis attempt?
pub fn looks_like_diagnosis(text: &str, diagnosis: &str) -> bool {
    let lowered = text.to_lowercase();
    (!diagnosis.is_empty() && lowered.contains(&diagnosis.to_lowercase()))
        || DIAGNOSIS_INTENT_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// A parsed referee judgment plus the raw text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgment {
    pub passed: bool,
    pub rule: VerdictRule,
    pub raw: String,
}

pub struct SystemReferee {
    gateway: Arc<dyn JudgeGateway>,
}

impl SystemReferee {
    pub fn new(gateway: Arc<dyn JudgeGateway>) -> Self {
        Self { gateway }
    }

    /// Is the latest patient message plausible and in role?
    pub async fn judge_plausibility(&self, session: &Session) -> Result<Judgment, JudgeError> {
        let messages = session.messages();
        let latest = messages
            .iter()
            .rposition(|m| m.is_from(Sender::Patient))
            .unwrap_or(messages.len());
        let history = prompts::format_history(&messages[..latest]);
        let current = messages
            .get(latest)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        self.judge(
            session,
            JudgeTask::PlausibilityCheck,
            VerdictKind::Plausibility,
            prompts::plausibility_prompt(&history, current),
        )
        .await
    }

    /// Did the doctor name the hidden diagnosis?
    pub async fn judge_diagnosis(
        &self,
        session: &Session,
        doctor_message: &str,
    ) -> Result<Judgment, JudgeError> {
        self.judge(
            session,
            JudgeTask::DiagnosisCheck,
            VerdictKind::DiagnosisCorrectness,
            prompts::diagnosis_prompt(doctor_message, session.diagnosis()),
        )
        .await
    }

    async fn judge(
        &self,
        session: &Session,
        task: JudgeTask,
        kind: VerdictKind,
        prompt: String,
    ) -> Result<Judgment, JudgeError> {
        let raw = self
            .gateway
            .invoke(
                JudgeRequest::new(task, prompt, prompts::referee_context(session.diagnosis()))
                    .for_session(session.id()),
            )
            .await?;
        let verdict = evaluate(kind, &raw);
        debug!(
            session_id = %session.id(),
            task = %task,
            passed = verdict.value,
            rule = ?verdict.rule,
            "Referee verdict parsed"
        );
        Ok(Judgment {
            passed: verdict.value,
            rule: verdict.rule,
            raw,
        })
    }
}
