//! Body oracle.
//!
//! Answers the patient's ask-body query with a symptom list. Knows the
//! diagnosis but never names it.

use std::sync::Arc;

use super::prompts;
use crate::domain::dialogue::markers::{extract_body_query, strip_markers};
use crate::domain::dialogue::message::Sender;
use crate::domain::dialogue::session::Session;
use crate::ports::{JudgeError, JudgeGateway, JudgeRequest, JudgeTask};

pub const BODY_FALLBACK: &str = "- 全身：说不清的不适感\n- 具体表现为常见的疲乏和难受";

/// Stand-in for the disease name if the model lets it slip.
const REDACTED_NAME: &str = "这种不适";

pub struct BodyOracle {
    gateway: Arc<dyn JudgeGateway>,
}

impl BodyOracle {
    pub fn new(gateway: Arc<dyn JudgeGateway>) -> Self {
        Self { gateway }
    }

    /// Returns the query the oracle would answer for the latest patient message.
    pub fn query_for(session: &Session) -> String {
        let last_patient = session
            .last_from(Sender::Patient)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        extract_body_query(last_patient)
    }

    /// Describes bodily sensations for the latest patient query.
    pub async fn describe(&self, session: &Session) -> Result<String, JudgeError> {
        let query = Self::query_for(session);
        let history = prompts::format_history(session.messages());
        let raw = self
            .gateway
            .invoke(
                JudgeRequest::new(
                    JudgeTask::BodySensation,
                    prompts::body_prompt(&history, &query),
                    prompts::body_context(session.diagnosis()),
                )
                .for_session(session.id()),
            )
            .await?;

        let content = redact(&strip_markers(&raw), session.diagnosis());
        if content.trim().is_empty() {
            Ok(BODY_FALLBACK.to_string())
        } else {
            Ok(content)
        }
    }
}

fn redact(text: &str, diagnosis: &str) -> String {
    if diagnosis.is_empty() {
        return text.to_string();
    }
    text.replace(diagnosis, REDACTED_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockJudgeGateway;
    use crate::domain::dialogue::markers::DEFAULT_BODY_QUERY;
    use crate::domain::dialogue::message::Message;
    use crate::domain::foundation::{SessionId, Timestamp};

    fn session_asking(patient_line: &str) -> Session {
        let mut s = Session::new(SessionId::new(), "关节炎", Timestamp::now()).unwrap();
        s.push(Message::patient("医生好。"));
        s.push(Message::doctor("哪里疼？"));
        s.push(Message::patient(patient_line));
        s
    }

    #[tokio::test]
    async fn answers_primary_query() {
        let gateway = Arc::new(MockJudgeGateway::new());
        gateway.push_reply(JudgeTask::BodySensation, "- 手指关节：晨起僵硬");
        let oracle = BodyOracle::new(gateway.clone());

        let content = oracle
            .describe(&session_asking("[询问身体:我的手指怎么了？]"))
            .await
            .unwrap();

        assert_eq!(content, "- 手指关节：晨起僵硬");
        let call = &gateway.calls()[0];
        assert!(call.prompt.contains("我的手指怎么了？"));
        assert!(call.role_context.contains("关节炎"));
    }

    #[test]
    fn query_falls_back_to_legacy_then_default() {
        assert_eq!(
            BodyOracle::query_for(&session_asking("[询问身体]: 膝盖疼吗")),
            "膝盖疼吗"
        );
        assert_eq!(
            BodyOracle::query_for(&session_asking("没有标记")),
            DEFAULT_BODY_QUERY
        );
    }

    #[tokio::test]
    async fn never_names_the_diagnosis() {
        let gateway = Arc::new(MockJudgeGateway::new());
        gateway.push_reply(JudgeTask::BodySensation, "- 关节炎典型的晨僵");
        let oracle = BodyOracle::new(gateway);

        let content = oracle.describe(&session_asking("[询问身体:x]")).await.unwrap();

        assert!(!content.contains("关节炎"));
    }

    #[tokio::test]
    async fn empty_output_uses_generic_bullet() {
        let gateway = Arc::new(MockJudgeGateway::new());
        gateway.push_reply(JudgeTask::BodySensation, "  \n ");
        let oracle = BodyOracle::new(gateway);

        let content = oracle.describe(&session_asking("[询问身体:x]")).await.unwrap();

        assert_eq!(content, BODY_FALLBACK);
        assert!(!BODY_FALLBACK.contains("关节炎"));
    }
}
