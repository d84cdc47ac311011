//! Mock Judge Gateway for testing.
//!
//! Scriptable stand-in for the language model, so engine and handler tests
//! run without network access.
//!
//! # Features
//!
//! - Per-task reply queues, consumed in order
//! - Per-task default replies once a queue is empty
//! - Error injection
//! - Simulated latency
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockJudgeGateway::new();
//! gateway.push_reply(JudgeTask::DiagnosisCheck, "诊断正确: 是");
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{JudgeError, JudgeGateway, JudgeRequest, JudgeTask};

/// Default reply for a task when nothing is queued.
fn builtin_default(task: JudgeTask) -> &'static str {
    match task {
        JudgeTask::InitialSymptoms => "- 头痛\n- 发热",
        JudgeTask::PatientGreeting
        | JudgeTask::PatientReply
        | JudgeTask::PatientAfterBody
        | JudgeTask::PatientRewrite => "医生您好，我最近一直头疼。",
        JudgeTask::BodySensation => "- 头部：胀痛",
        JudgeTask::PlausibilityCheck => "合理性: 合理",
        JudgeTask::DiagnosisCheck => "诊断正确: 否",
    }
}

#[derive(Debug, Default)]
struct MockState {
    queued: HashMap<JudgeTask, VecDeque<Result<String, JudgeError>>>,
    defaults: HashMap<JudgeTask, String>,
    calls: Vec<JudgeRequest>,
}

/// Mock judge gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct MockJudgeGateway {
    state: Arc<Mutex<MockState>>,
    delay: Duration,
}

impl MockJudgeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a reply for the next call of `task`.
    pub fn push_reply(&self, task: JudgeTask, reply: impl Into<String>) {
        self.lock()
            .queued
            .entry(task)
            .or_default()
            .push_back(Ok(reply.into()));
    }

    /// Queues an error for the next call of `task`.
    pub fn push_error(&self, task: JudgeTask, error: JudgeError) {
        self.lock().queued.entry(task).or_default().push_back(Err(error));
    }

    /// Replaces the reply used for `task` once its queue is empty.
    pub fn set_default(&self, task: JudgeTask, reply: impl Into<String>) {
        self.lock().defaults.insert(task, reply.into());
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<JudgeRequest> {
        self.lock().calls.clone()
    }

    /// Tasks of all recorded calls, in call order.
    pub fn tasks(&self) -> Vec<JudgeTask> {
        self.lock().calls.iter().map(|c| c.task).collect()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl JudgeGateway for MockJudgeGateway {
    async fn invoke(&self, request: JudgeRequest) -> Result<String, JudgeError> {
        let task = request.task;
        let next = {
            let mut state = self.lock();
            state.calls.push(request);
            match state.queued.get_mut(&task).and_then(|q| q.pop_front()) {
                Some(scripted) => scripted,
                None => Ok(state
                    .defaults
                    .get(&task)
                    .cloned()
                    .unwrap_or_else(|| builtin_default(task).to_string())),
            }
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(task: JudgeTask) -> JudgeRequest {
        JudgeRequest::new(task, "prompt", "context")
    }

    #[tokio::test]
    async fn queued_replies_are_consumed_in_order_then_default() {
        let gateway = MockJudgeGateway::new();
        gateway.push_reply(JudgeTask::PatientReply, "one");
        gateway.push_reply(JudgeTask::PatientReply, "two");

        assert_eq!(gateway.invoke(request(JudgeTask::PatientReply)).await.unwrap(), "one");
        assert_eq!(gateway.invoke(request(JudgeTask::PatientReply)).await.unwrap(), "two");
        assert_eq!(
            gateway.invoke(request(JudgeTask::PatientReply)).await.unwrap(),
            builtin_default(JudgeTask::PatientReply)
        );
    }

    #[tokio::test]
    async fn queues_are_per_task() {
        let gateway = MockJudgeGateway::new();
        gateway.push_reply(JudgeTask::BodySensation, "- 胸口闷");

        assert_eq!(
            gateway.invoke(request(JudgeTask::DiagnosisCheck)).await.unwrap(),
            "诊断正确: 否"
        );
        assert_eq!(
            gateway.invoke(request(JudgeTask::BodySensation)).await.unwrap(),
            "- 胸口闷"
        );
    }

    #[tokio::test]
    async fn injected_errors_are_returned() {
        let gateway = MockJudgeGateway::new();
        gateway.push_error(JudgeTask::PlausibilityCheck, JudgeError::rate_limited(5));

        let result = gateway.invoke(request(JudgeTask::PlausibilityCheck)).await;

        assert_eq!(result, Err(JudgeError::rate_limited(5)));
    }

    #[tokio::test]
    async fn set_default_overrides_builtin() {
        let gateway = MockJudgeGateway::new();
        gateway.set_default(JudgeTask::PlausibilityCheck, "合理性: 不合理");

        assert_eq!(
            gateway.invoke(request(JudgeTask::PlausibilityCheck)).await.unwrap(),
            "合理性: 不合理"
        );
    }

    #[tokio::test]
    async fn tracks_calls() {
        let gateway = MockJudgeGateway::new();
        gateway.invoke(request(JudgeTask::InitialSymptoms)).await.unwrap();
        gateway.invoke(request(JudgeTask::PatientGreeting)).await.unwrap();

        assert_eq!(gateway.call_count(), 2);
        assert_eq!(
            gateway.tasks(),
            vec![JudgeTask::InitialSymptoms, JudgeTask::PatientGreeting]
        );

        gateway.clear_calls();
        assert_eq!(gateway.call_count(), 0);
    }
}
