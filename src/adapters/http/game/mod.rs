//! HTTP adapter for the diagnostic game.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ActiveGamesResponse, ErrorResponse, GameStateResponse, GameSummaryResponse, LogsResponse,
    SendMessageRequest, StatsResponse,
};
pub use handlers::{client_identity, GameAppState};
pub use routes::game_router;
