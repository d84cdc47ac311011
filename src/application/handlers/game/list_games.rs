//! ListGamesHandler - Summaries of every stored game.

use std::sync::Arc;

use crate::domain::dialogue::{GameError, GameSummary};
use crate::ports::SessionStore;

pub struct ListGamesHandler {
    store: Arc<dyn SessionStore>,
}

impl ListGamesHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Oldest game first.
    pub async fn handle(&self) -> Result<Vec<GameSummary>, GameError> {
        let sessions = self.store.list().await?;
        Ok(sessions.iter().map(GameSummary::of).collect())
    }
}
