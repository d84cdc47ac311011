//! In-Memory Session Store Adapter
//!
//! Keeps sessions in a process-local map. Sessions are never destroyed
//! explicitly; `purge_idle` evicts those untouched for longer than the TTL.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::Session;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{SessionStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn put(&self, session: Session) -> Result<(), StoreError> {
        self.sessions.write().await.insert(session.id(), session);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Session>, StoreError> {
        let mut sessions: Vec<Session> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by_key(|s| s.created_at());
        Ok(sessions)
    }

    async fn purge_idle(&self, cutoff: Timestamp) -> Result<Vec<SessionId>, StoreError> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<SessionId> = sessions
            .values()
            .filter(|s| s.is_idle_since(&cutoff))
            .map(|s| s.id())
            .collect();
        for id in &idle {
            sessions.remove(id);
        }
        Ok(idle)
    }
}
