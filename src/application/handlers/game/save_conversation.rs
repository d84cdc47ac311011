//! SaveConversationHandler - Exports a readable transcript of one game.
//!
//! The transcript holds what the player saw (body messages and markers are
//! already gone from the view) followed by the game's log entries. Files are
//! written under the configured export directory as
//! `conversation_<game_id>_<YYYYmmdd_HHMMSS>.txt`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::info;

use crate::domain::dialogue::{GameError, SessionView};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{ConversationLog, LogEntry, SessionStore};

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone)]
pub struct SaveConversationCommand {
    pub game_id: SessionId,
    pub requested_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveConversationResult {
    /// Path of the written transcript.
    pub filename: String,
}

pub struct SaveConversationHandler {
    store: Arc<dyn SessionStore>,
    log: Arc<dyn ConversationLog>,
    export_dir: PathBuf,
}

impl SaveConversationHandler {
    pub fn new<P: AsRef<Path>>(
        store: Arc<dyn SessionStore>,
        log: Arc<dyn ConversationLog>,
        export_dir: P,
    ) -> Self {
        Self {
            store,
            log,
            export_dir: export_dir.as_ref().to_path_buf(),
        }
    }

    pub async fn handle(
        &self,
        cmd: SaveConversationCommand,
    ) -> Result<SaveConversationResult, GameError> {
        let session = self
            .store
            .get(&cmd.game_id)
            .await?
            .ok_or_else(|| GameError::not_found(cmd.game_id))?;
        let entries = self
            .log
            .entries(cmd.game_id)
            .await
            .map_err(|e| GameError::storage(e.to_string()))?;

        let transcript = render_transcript(&SessionView::of(&session), &entries);

        fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| GameError::storage(format!("transcript dir: {}", e)))?;
        let path = self.export_dir.join(format!(
            "conversation_{}_{}.txt",
            cmd.game_id,
            cmd.requested_at.as_datetime().format("%Y%m%d_%H%M%S")
        ));
        fs::write(&path, transcript)
            .await
            .map_err(|e| GameError::storage(format!("transcript write: {}", e)))?;

        let filename = path.display().to_string();
        info!(game_id = %cmd.game_id, filename = %filename, "Conversation saved");
        Ok(SaveConversationResult { filename })
    }
}

/// Plain-text transcript: header, dialogue, then log entries if any.
fn render_transcript(view: &SessionView, entries: &[LogEntry]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{}\n{:>28}\n{}\n", rule, "AI问诊小游戏记录", rule);
    let _ = writeln!(out, "## 对话内容\n{}\n", thin);
    for message in &view.messages {
        let _ = writeln!(out, "{}：{}\n", message.sender.prompt_label(), message.content);
    }
    if let Some(diagnosis) = &view.diagnosis {
        let _ = writeln!(out, "正确诊断：{}\n", diagnosis);
    }

    if !entries.is_empty() {
        let _ = writeln!(out, "\n## 游戏日志\n{}\n", thin);
        for entry in entries {
            let _ = writeln!(out, "[{}] {}\n", entry.timestamp, entry.text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::log::InMemoryConversationLog;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::dialogue::{DialoguePhase, Message, Session};
    use tempfile::TempDir;

    struct Fixture {
        store: Arc<InMemorySessionStore>,
        log: Arc<InMemoryConversationLog>,
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(InMemorySessionStore::new()),
                log: Arc::new(InMemoryConversationLog::new()),
                dir: TempDir::new().unwrap(),
            }
        }

        fn handler(&self) -> SaveConversationHandler {
            SaveConversationHandler::new(
                self.store.clone(),
                self.log.clone(),
                self.dir.path().join("transcripts"),
            )
        }
    }

    fn session_with_body_exchange() -> Session {
        let mut s = Session::new(SessionId::new(), "偏头痛", Timestamp::now()).unwrap();
        s.push(Message::patient("医生，我头疼。[询问身体: 哪里疼]"));
        s.push(Message::body("左侧太阳穴一跳一跳地疼"));
        s.push(Message::patient("左边太阳穴一跳一跳的。"));
        s.enter_phase(DialoguePhase::DoctorTurn);
        s
    }

    #[tokio::test]
    async fn writes_visible_dialogue_and_logs() {
        let f = Fixture::new();
        let session = session_with_body_exchange();
        let id = session.id();
        f.store.put(session).await.unwrap();
        f.log.append(id, LogEntry::new("新游戏开始")).await.unwrap();

        let result = f
            .handler()
            .handle(SaveConversationCommand {
                game_id: id,
                requested_at: Timestamp::from_unix_secs(1_700_000_000),
            })
            .await
            .unwrap();

        assert!(result.filename.ends_with(&format!("conversation_{}_20231114_221320.txt", id)));
        let text = std::fs::read_to_string(&result.filename).unwrap();
        assert!(text.contains("AI问诊小游戏记录"));
        assert!(text.contains("病人：医生，我头疼。"));
        assert!(text.contains("病人：左边太阳穴一跳一跳的。"));
        assert!(text.contains("新游戏开始"));
        assert!(!text.contains("询问身体"));
        assert!(!text.contains("左侧太阳穴"));
        assert!(!text.contains("偏头痛"));
    }

    #[tokio::test]
    async fn finished_game_reveals_diagnosis() {
        let f = Fixture::new();
        let mut session = session_with_body_exchange();
        session.enter_phase(DialoguePhase::GameOver);
        let id = session.id();
        f.store.put(session).await.unwrap();

        let result = f
            .handler()
            .handle(SaveConversationCommand { game_id: id, requested_at: Timestamp::now() })
            .await
            .unwrap();

        let text = std::fs::read_to_string(&result.filename).unwrap();
        assert!(text.contains("正确诊断：偏头痛"));
        assert!(!text.contains("## 游戏日志"));
    }

    #[tokio::test]
    async fn unknown_game_is_not_found_and_writes_nothing() {
        let f = Fixture::new();
        let id = SessionId::new();

        let err = f
            .handler()
            .handle(SaveConversationCommand { game_id: id, requested_at: Timestamp::now() })
            .await
            .unwrap_err();

        assert_eq!(err, GameError::NotFound(id));
        assert!(!f.dir.path().join("transcripts").exists());
    }
}
