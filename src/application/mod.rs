//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes to one game are serialized through `KeyedLocks`; duplicate
//! creation requests are collapsed by `DedupCache`.

mod dedup_cache;
pub mod handlers;
mod keyed_locks;

pub use dedup_cache::DedupCache;
pub use handlers::game::{
    CreateGameCommand, CreateGameHandler, CreateGameResult, GetGameHandler, GetGameQuery,
    GetLogsHandler, GetLogsQuery, GetStatsHandler, ListGamesHandler, SaveConversationCommand,
    SaveConversationHandler, SaveConversationResult, SendMessageCommand, SendMessageHandler,
    SendMessageResult,
};
pub use keyed_locks::KeyedLocks;
