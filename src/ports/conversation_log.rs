//! Conversation Log Port - Human-readable per-session audit trail.
//!
//! Appends are fire-and-forget from the engine's point of view: callers log
//! failures and carry on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{SessionId, Timestamp};

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub text: String,
}

impl LogEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            timestamp: Timestamp::now(),
            text: text.into(),
        }
    }
}

#[async_trait]
pub trait ConversationLog: Send + Sync {
    async fn append(&self, session_id: SessionId, entry: LogEntry) -> Result<(), LogError>;

    /// Entries for a session in append order; empty if none were written.
    async fn entries(&self, session_id: SessionId) -> Result<Vec<LogEntry>, LogError>;
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("log io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("log entry malformed: {0}")]
    Malformed(String),
}
