//! GetGameHandler - Query handler for the player view of a game.

use std::sync::Arc;

use crate::domain::dialogue::{GameError, SessionView};
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

#[derive(Debug, Clone)]
pub struct GetGameQuery {
    pub game_id: SessionId,
}

pub struct GetGameHandler {
    store: Arc<dyn SessionStore>,
}

impl GetGameHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetGameQuery) -> Result<SessionView, GameError> {
        let session = self
            .store
            .get(&query.game_id)
            .await?
            .ok_or(GameError::NotFound(query.game_id))?;
        Ok(SessionView::of(&session))
    }
}
