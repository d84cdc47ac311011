//! Session Store Port - Keyed persistence for dialogue sessions.
//!
//! The store exclusively owns session state. Callers read a copy, let the
//! engine derive the next state, and write the whole session back.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::dialogue::Session;
use crate::domain::foundation::{SessionId, Timestamp};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session, `None` if the id is unknown.
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Inserts or replaces a session.
    async fn put(&self, session: Session) -> Result<(), StoreError>;

    /// All stored sessions, oldest first.
    async fn list(&self) -> Result<Vec<Session>, StoreError>;

    /// Drops sessions whose last update is before `cutoff`. Returns the evicted ids.
    async fn purge_idle(&self, cutoff: Timestamp) -> Result<Vec<SessionId>, StoreError>;
}

/// Storage backend failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage corrupted: {0}")]
    Corrupted(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }
}
