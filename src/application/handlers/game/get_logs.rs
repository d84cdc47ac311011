//! GetLogsHandler - Conversation log of one game.

use std::sync::Arc;

use crate::domain::dialogue::GameError;
use crate::domain::foundation::SessionId;
use crate::ports::{ConversationLog, LogEntry, SessionStore};

#[derive(Debug, Clone)]
pub struct GetLogsQuery {
    pub game_id: SessionId,
}

pub struct GetLogsHandler {
    store: Arc<dyn SessionStore>,
    log: Arc<dyn ConversationLog>,
}

impl GetLogsHandler {
    pub fn new(store: Arc<dyn SessionStore>, log: Arc<dyn ConversationLog>) -> Self {
        Self { store, log }
    }

    /// Unknown games are `NotFound` even if stray entries exist.
    pub async fn handle(&self, query: GetLogsQuery) -> Result<Vec<LogEntry>, GameError> {
        if self.store.get(&query.game_id).await?.is_none() {
            return Err(GameError::NotFound(query.game_id));
        }
        self.log
            .entries(query.game_id)
            .await
            .map_err(|e| GameError::storage(e.to_string()))
    }
}
