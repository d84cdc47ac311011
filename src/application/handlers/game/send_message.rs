//! SendMessageHandler - Runs one doctor turn under the session's lock.

use std::sync::Arc;

use tracing::{info, warn};

use super::record_notes;
use crate::application::KeyedLocks;
use crate::domain::dialogue::{DialogueEngine, GameError, Resolution, SessionView};
use crate::domain::foundation::SessionId;
use crate::ports::{ConversationLog, SessionStore, StatsStore};

/// Command carrying one doctor utterance.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub game_id: SessionId,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub view: SessionView,
    /// Set when this message ended the game.
    pub resolution: Option<Resolution>,
}

pub struct SendMessageHandler {
    store: Arc<dyn SessionStore>,
    stats: Arc<dyn StatsStore>,
    engine: Arc<DialogueEngine>,
    log: Arc<dyn ConversationLog>,
    locks: Arc<KeyedLocks<SessionId>>,
}

impl SendMessageHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        stats: Arc<dyn StatsStore>,
        engine: Arc<DialogueEngine>,
        log: Arc<dyn ConversationLog>,
        locks: Arc<KeyedLocks<SessionId>>,
    ) -> Self {
        Self {
            store,
            stats,
            engine,
            log,
            locks,
        }
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<SendMessageResult, GameError> {
        // 1. One turn at a time per session
        let _guard = self.locks.lock(&cmd.game_id).await;

        // 2. Load
        let session = self
            .store
            .get(&cmd.game_id)
            .await?
            .ok_or(GameError::NotFound(cmd.game_id))?;

        // 3. Drive the turn on a copy
        let outcome = match self.engine.handle_doctor_message(&session, &cmd.message).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if matches!(e, GameError::JudgeTransient(_) | GameError::JudgeFatal(_)) {
                    warn!(game_id = %cmd.game_id, error = %e, "Turn aborted, session unchanged");
                }
                return Err(e);
            }
        };

        // 4. Commit
        self.store.put(outcome.session.clone()).await?;

        if let Some(resolution) = outcome.resolution {
            let diagnosis = outcome.session.diagnosis();
            if let Err(e) = self
                .stats
                .record_attempt(diagnosis, resolution.is_correct())
                .await
            {
                warn!(game_id = %cmd.game_id, error = %e, "Failed to record diagnosis attempt");
            }
            info!(
                game_id = %cmd.game_id,
                correct = resolution.is_correct(),
                turns = outcome.session.turn_count(),
                "Game finished"
            );
        }

        let mut notes = vec![format!("医生：{}", cmd.message.trim())];
        notes.extend(outcome.notes);
        record_notes(self.log.as_ref(), cmd.game_id, notes).await;

        Ok(SendMessageResult {
            view: SessionView::of(&outcome.session),
            resolution: outcome.resolution,
        })
    }
}
