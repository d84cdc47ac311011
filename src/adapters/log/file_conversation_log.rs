//! File-based Conversation Log Adapter
//!
//! One JSON-lines file per session under a base directory:
//! `<base>/<session_id>.log`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::domain::foundation::SessionId;
use crate::ports::{ConversationLog, LogEntry, LogError};

#[derive(Debug, Clone)]
pub struct FileConversationLog {
    base_path: PathBuf,
}

impl FileConversationLog {
    /// # Example
    /// ```ignore
    /// let log = FileConversationLog::new("./conversations");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, session_id: SessionId) -> PathBuf {
        self.base_path.join(format!("{}.log", session_id))
    }
}

#[async_trait]
impl ConversationLog for FileConversationLog {
    async fn append(&self, session_id: SessionId, entry: LogEntry) -> Result<(), LogError> {
        fs::create_dir_all(&self.base_path).await?;

        let mut line =
            serde_json::to_string(&entry).map_err(|e| LogError::Malformed(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_path(session_id))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn entries(&self, session_id: SessionId) -> Result<Vec<LogEntry>, LogError> {
        let path = self.file_path(session_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).await?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(|e| LogError::Malformed(e.to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn appends_and_reads_back_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let log = FileConversationLog::new(temp_dir.path());
        let id = SessionId::new();

        log.append(id, LogEntry::new("身体反馈：- 头部：胀痛\n- 颈部：僵硬")).await.unwrap();
        log.append(id, LogEntry::new("诊断判断：诊断正确: 否")).await.unwrap();

        let entries = log.entries(id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "身体反馈：- 头部：胀痛\n- 颈部：僵硬");
        assert_eq!(entries[1].text, "诊断判断：诊断正确: 否");
        assert!(temp_dir.path().join(format!("{}.log", id)).exists());
    }

    #[tokio::test]
    async fn creates_missing_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log = FileConversationLog::new(temp_dir.path().join("nested/logs"));
        let id = SessionId::new();

        log.append(id, LogEntry::new("x")).await.unwrap();

        assert_eq!(log.entries(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_session_has_no_entries() {
        let temp_dir = TempDir::new().unwrap();
        let log = FileConversationLog::new(temp_dir.path());
        assert!(log.entries(SessionId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupted_line_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let log = FileConversationLog::new(temp_dir.path());
        let id = SessionId::new();
        std::fs::write(temp_dir.path().join(format!("{}.log", id)), "not json\n").unwrap();

        assert!(matches!(log.entries(id).await, Err(LogError::Malformed(_))));
    }
}
