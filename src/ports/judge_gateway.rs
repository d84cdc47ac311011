//! Judge Gateway Port - Interface to the language model behind every role.
//!
//! The patient, the body and the referee all speak through this port: the
//! engine hands over a prompt plus a role context (the system instruction)
//! and gets free-form text back. The gateway is an unreliable oracle: slow,
//! occasionally malformed, and it never retries on its own.
//!
//! # Example
//!
//! ```ignore
//! let reply = gateway
//!     .invoke(JudgeRequest::new(JudgeTask::DiagnosisCheck, prompt, context).for_session(id))
//!     .await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::SessionId;

/// Port for language model calls.
#[async_trait]
pub trait JudgeGateway: Send + Sync {
    /// Sends one prompt and returns the raw reply text.
    ///
    /// # Errors
    ///
    /// Transport and provider failures, classified by [`JudgeError::kind`].
    async fn invoke(&self, request: JudgeRequest) -> Result<String, JudgeError>;
}

/// What a gateway call is for. Drives tracing and lets test doubles script replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeTask {
    /// One-time draw of the first symptoms for a new game.
    InitialSymptoms,
    /// Patient's opening line.
    PatientGreeting,
    /// Patient's ordinary reply to the doctor.
    PatientReply,
    /// Patient reply that folds in what the body reported.
    PatientAfterBody,
    /// Rewrite of a patient message the referee rejected.
    PatientRewrite,
    /// Body oracle's sensation list.
    BodySensation,
    /// Referee: is the patient message plausible?
    PlausibilityCheck,
    /// Referee: did the doctor name the diagnosis?
    DiagnosisCheck,
}

impl JudgeTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialSymptoms => "initial_symptoms",
            Self::PatientGreeting => "patient_greeting",
            Self::PatientReply => "patient_reply",
            Self::PatientAfterBody => "patient_after_body",
            Self::PatientRewrite => "patient_rewrite",
            Self::BodySensation => "body_sensation",
            Self::PlausibilityCheck => "plausibility_check",
            Self::DiagnosisCheck => "diagnosis_check",
        }
    }
}

impl fmt::Display for JudgeTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeRequest {
    pub task: JudgeTask,
    /// User-turn content.
    pub prompt: String,
    /// System instruction describing the role being played.
    pub role_context: String,
    /// Session the call belongs to, for tracing.
    pub session_id: Option<SessionId>,
}

impl JudgeRequest {
    pub fn new(task: JudgeTask, prompt: impl Into<String>, role_context: impl Into<String>) -> Self {
        Self {
            task,
            prompt: prompt.into(),
            role_context: role_context.into(),
            session_id: None,
        }
    }

    pub fn for_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// Whether the caller may safely resend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeErrorKind {
    Transient,
    Fatal,
}

/// Gateway failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JudgeError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider reply could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),
}

impl JudgeError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout(timeout_secs: u32) -> Self {
        Self::Timeout { timeout_secs }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Classifies the failure.
    pub fn kind(&self) -> JudgeErrorKind {
        match self {
            JudgeError::RateLimited { .. }
            | JudgeError::Unavailable { .. }
            | JudgeError::Network(_)
            | JudgeError::Timeout { .. } => JudgeErrorKind::Transient,
            JudgeError::AuthenticationFailed
            | JudgeError::InvalidRequest(_)
            | JudgeError::Parse(_) => JudgeErrorKind::Fatal,
        }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind() == JudgeErrorKind::Transient
    }
}
