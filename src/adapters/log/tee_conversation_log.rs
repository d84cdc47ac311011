//! Conversation log that writes to two logs and reads from the first.
//!
//! The binary pairs the in-memory log (served over HTTP) with the file log
//! (kept on disk).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::domain::foundation::SessionId;
use crate::ports::{ConversationLog, LogEntry, LogError};

pub struct TeeConversationLog {
    primary: Arc<dyn ConversationLog>,
    secondary: Arc<dyn ConversationLog>,
}

impl TeeConversationLog {
    pub fn new(primary: Arc<dyn ConversationLog>, secondary: Arc<dyn ConversationLog>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl ConversationLog for TeeConversationLog {
    /// The secondary's failure is logged, not returned.
    async fn append(&self, session_id: SessionId, entry: LogEntry) -> Result<(), LogError> {
        if let Err(e) = self.secondary.append(session_id, entry.clone()).await {
            warn!(session_id = %session_id, error = %e, "Secondary conversation log append failed");
        }
        self.primary.append(session_id, entry).await
    }

    async fn entries(&self, session_id: SessionId) -> Result<Vec<LogEntry>, LogError> {
        self.primary.entries(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::log::{FileConversationLog, InMemoryConversationLog};
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_both_and_reads_primary() {
        let temp_dir = TempDir::new().unwrap();
        let memory = Arc::new(InMemoryConversationLog::new());
        let file = Arc::new(FileConversationLog::new(temp_dir.path()));
        let tee = TeeConversationLog::new(memory.clone(), file.clone());
        let id = SessionId::new();

        tee.append(id, LogEntry::new("病人询问身体：头疼吗")).await.unwrap();

        assert_eq!(memory.entries(id).await.unwrap().len(), 1);
        assert_eq!(file.entries(id).await.unwrap().len(), 1);
        assert_eq!(tee.entries(id).await.unwrap()[0].text, "病人询问身体：头疼吗");
    }

    #[tokio::test]
    async fn secondary_failure_does_not_fail_append() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected makes every append fail.
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let memory = Arc::new(InMemoryConversationLog::new());
        let broken = Arc::new(FileConversationLog::new(&blocker));
        let tee = TeeConversationLog::new(memory.clone(), broken);
        let id = SessionId::new();

        tee.append(id, LogEntry::new("x")).await.unwrap();

        assert_eq!(memory.entries(id).await.unwrap().len(), 1);
    }
}
