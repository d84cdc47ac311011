//! Game command and query handlers.

mod create_game;
mod get_game;
mod get_logs;
mod get_stats;
mod list_games;
mod save_conversation;
mod send_message;

pub use create_game::{CreateGameCommand, CreateGameHandler, CreateGameResult};
pub use get_game::{GetGameHandler, GetGameQuery};
pub use get_logs::{GetLogsHandler, GetLogsQuery};
pub use get_stats::GetStatsHandler;
pub use list_games::ListGamesHandler;
pub use save_conversation::{
    SaveConversationCommand, SaveConversationHandler, SaveConversationResult,
};
pub use send_message::{SendMessageCommand, SendMessageHandler, SendMessageResult};

use tracing::warn;

use crate::domain::foundation::SessionId;
use crate::ports::{ConversationLog, LogEntry};

/// Appends audit notes; failures are logged and swallowed.
async fn record_notes(log: &dyn ConversationLog, game_id: SessionId, notes: Vec<String>) {
    for note in notes {
        if let Err(e) = log.append(game_id, LogEntry::new(note)).await {
            warn!(game_id = %game_id, error = %e, "Conversation log append failed");
            return;
        }
    }
}
