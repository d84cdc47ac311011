//! HTTP DTOs for game endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::dialogue::{DiagnosisStat, GameError, GameSummary, Message, SessionView};
use crate::ports::LogEntry;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Doctor utterance for a game.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub game_id: String,
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub sender: String,
    pub content: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            sender: message.sender.as_str().to_string(),
            content: message.content,
        }
    }
}

/// Player view of a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub game_id: String,
    pub messages: Vec<MessageResponse>,
    pub current_sender: String,
    pub game_over: bool,
    pub turn_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
}

impl From<SessionView> for GameStateResponse {
    fn from(view: SessionView) -> Self {
        Self {
            game_id: view.game_id.to_string(),
            messages: view.messages.into_iter().map(Into::into).collect(),
            current_sender: view.current_sender.as_str().to_string(),
            game_over: view.game_over,
            turn_count: view.turn_count,
            diagnosis: view.diagnosis,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummaryResponse {
    pub game_id: String,
    pub message_count: usize,
    pub game_over: bool,
    pub last_message: String,
}

impl From<GameSummary> for GameSummaryResponse {
    fn from(summary: GameSummary) -> Self {
        Self {
            game_id: summary.game_id.to_string(),
            message_count: summary.message_count,
            game_over: summary.game_over,
            last_message: summary.last_message.map(|m| m.content).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveGamesResponse {
    pub games: Vec<GameSummaryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryResponse {
    pub timestamp: String,
    pub text: String,
}

impl From<LogEntry> for LogEntryResponse {
    fn from(entry: LogEntry) -> Self {
        Self {
            timestamp: entry.timestamp.to_string(),
            text: entry.text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntryResponse>,
}

/// Where a transcript was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConversationResponse {
    pub filename: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatResponse {
    pub diagnosis: String,
    pub attempts: u64,
    pub correct: u64,
    pub success_rate: f64,
}

impl From<DiagnosisStat> for StatResponse {
    fn from(stat: DiagnosisStat) -> Self {
        Self {
            success_rate: stat.success_rate(),
            diagnosis: stat.diagnosis,
            attempts: stat.attempts,
            correct: stat.correct,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: Vec<StatResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body: `{error, code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }
}

impl From<&GameError> for ErrorResponse {
    fn from(error: &GameError) -> Self {
        Self {
            error: error.message(),
            code: error.code().to_string(),
        }
    }
}
