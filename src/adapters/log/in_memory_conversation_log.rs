//! In-Memory Conversation Log Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::ports::{ConversationLog, LogEntry, LogError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationLog {
    entries: Arc<RwLock<HashMap<SessionId, Vec<LogEntry>>>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the entries of sessions no longer stored.
    pub async fn forget(&self, session_ids: &[SessionId]) {
        let mut entries = self.entries.write().await;
        for id in session_ids {
            entries.remove(id);
        }
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn append(&self, session_id: SessionId, entry: LogEntry) -> Result<(), LogError> {
        self.entries
            .write()
            .await
            .entry(session_id)
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn entries(&self, session_id: SessionId) -> Result<Vec<LogEntry>, LogError> {
        Ok(self
            .entries
            .read()
            .await
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }
}
