//! CreateGameHandler - Starts a new game, collapsing duplicate requests.

use std::sync::Arc;

use tracing::{debug, info};

use super::record_notes;
use crate::application::{DedupCache, KeyedLocks};
use crate::domain::dialogue::{DiagnosisPicker, DialogueEngine, GameError, Session, SessionView};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{ConversationLog, SessionStore};

/// Command to create a new game.
#[derive(Debug, Clone)]
pub struct CreateGameCommand {
    /// Who is asking; feeds the dedup key.
    pub client_identity: String,
    pub requested_at: Timestamp,
}

/// Result of successful game creation. Cached verbatim for duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGameResult {
    pub view: SessionView,
}

/// Handler for creating games.
pub struct CreateGameHandler {
    store: Arc<dyn SessionStore>,
    engine: Arc<DialogueEngine>,
    picker: Arc<dyn DiagnosisPicker>,
    log: Arc<dyn ConversationLog>,
    dedup: Arc<DedupCache<CreateGameResult>>,
    creation_locks: KeyedLocks<String>,
}

impl CreateGameHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        engine: Arc<DialogueEngine>,
        picker: Arc<dyn DiagnosisPicker>,
        log: Arc<dyn ConversationLog>,
        dedup: Arc<DedupCache<CreateGameResult>>,
    ) -> Self {
        Self {
            store,
            engine,
            picker,
            log,
            dedup,
            creation_locks: KeyedLocks::new(),
        }
    }

    pub async fn handle(&self, cmd: CreateGameCommand) -> Result<CreateGameResult, GameError> {
        // 1. Serialize requests sharing a dedup key
        let key = self.dedup.key(&cmd.client_identity, cmd.requested_at);
        let guard = self.creation_locks.lock(&key).await;
        let result = self.create_once(key, cmd.requested_at).await;
        drop(guard);

        self.creation_locks.prune();
        result
    }

    /// Runs under the per-key lock.
    async fn create_once(
        &self,
        key: String,
        requested_at: Timestamp,
    ) -> Result<CreateGameResult, GameError> {
        if let Some(cached) = self.dedup.get(&key) {
            debug!(game_id = %cached.view.game_id, "Duplicate new-game request served from cache");
            return Ok(cached);
        }

        // 2. Draw the diagnosis and build the session
        let diagnosis = self
            .picker
            .pick()
            .ok_or_else(|| GameError::internal("no diagnoses configured"))?;
        let session = Session::new(SessionId::new(), diagnosis, requested_at)?;
        let id = session.id();

        // 3. Opening patient cycle; nothing is stored if it fails
        let outcome = self.engine.start(session).await?;

        // 4. Persist
        self.store.put(outcome.session.clone()).await?;

        let mut notes = vec![format!("新游戏开始，疾病：{}", outcome.session.diagnosis())];
        notes.extend(outcome.notes);
        record_notes(self.log.as_ref(), id, notes).await;

        info!(game_id = %id, "Game created");

        let result = CreateGameResult {
            view: SessionView::of(&outcome.session),
        };
        self.dedup.insert(key, result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockJudgeGateway;
    use crate::adapters::log::InMemoryConversationLog;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::dialogue::{DialoguePolicy, FixedDiagnosisPicker, Sender, SymptomHintCache};
    use crate::ports::{JudgeError, JudgeTask};
    use futures::future::join_all;

    struct Fixture {
        handler: Arc<CreateGameHandler>,
        store: Arc<InMemorySessionStore>,
        log: Arc<InMemoryConversationLog>,
        gateway: MockJudgeGateway,
    }

    fn fixture() -> Fixture {
        let gateway = MockJudgeGateway::new();
        let store = Arc::new(InMemorySessionStore::new());
        let log = Arc::new(InMemoryConversationLog::new());
        let engine = Arc::new(DialogueEngine::new(
            Arc::new(gateway.clone()),
            Arc::new(SymptomHintCache::new(16)),
            DialoguePolicy::default(),
        ));
        let handler = Arc::new(CreateGameHandler::new(
            store.clone(),
            engine,
            Arc::new(FixedDiagnosisPicker("流感".to_string())),
            log.clone(),
            Arc::new(DedupCache::new(5, 16)),
        ));
        Fixture {
            handler,
            store,
            log,
            gateway,
        }
    }

    fn command(client: &str, secs: u64) -> CreateGameCommand {
        CreateGameCommand {
            client_identity: client.to_string(),
            requested_at: Timestamp::from_unix_secs(secs),
        }
    }

    #[tokio::test]
    async fn creates_game_waiting_for_doctor() {
        let f = fixture();

        let result = f.handler.handle(command("c1", 1_000)).await.unwrap();

        assert_eq!(result.view.current_sender, Sender::Doctor);
        assert!(!result.view.game_over);
        assert!(result.view.diagnosis.is_none());
        assert_eq!(result.view.messages.last().unwrap().sender, Sender::Patient);
        assert!(f.store.get(&result.view.game_id).await.unwrap().is_some());
        assert!(!f.log.entries(result.view.game_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_in_same_window_returns_same_game() {
        let f = fixture();

        let first = f.handler.handle(command("c1", 1_000)).await.unwrap();
        let second = f.handler.handle(command("c1", 1_003)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.store.len().await, 1);
        assert!(f.handler.creation_locks.is_empty());
    }

    #[tokio::test]
    async fn next_window_creates_new_game() {
        let f = fixture();

        let first = f.handler.handle(command("c1", 1_000)).await.unwrap();
        let second = f.handler.handle(command("c1", 1_010)).await.unwrap();

        assert_ne!(first.view.game_id, second.view.game_id);
        assert_eq!(f.store.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_duplicates_create_one_game() {
        let f = fixture();

        let results = join_all((0..8).map(|_| f.handler.handle(command("c1", 2_000)))).await;
        let mut ids: Vec<_> = results
            .into_iter()
            .map(|r| r.unwrap().view.game_id)
            .collect();

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(f.store.len().await, 1);
    }

    #[tokio::test]
    async fn judge_failure_stores_nothing_and_is_not_cached() {
        let f = fixture();
        f.gateway
            .push_error(JudgeTask::InitialSymptoms, JudgeError::unavailable("down"));

        let err = f.handler.handle(command("c1", 1_000)).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(f.store.len().await, 0);
        assert!(f.handler.creation_locks.is_empty());

        let retried = f.handler.handle(command("c1", 1_001)).await.unwrap();
        assert!(f.store.get(&retried.view.game_id).await.unwrap().is_some());
    }
}
