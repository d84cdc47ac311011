//! Axum router configuration for game endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    active_games, game_logs, game_status, health, new_game, save_conversation, send_message, stats,
    GameAppState,
};

/// Create the game router.
///
/// # Routes
///
/// - `POST /api/new_game` - Start a game
/// - `POST /api/send_message` - Submit a doctor utterance
/// - `GET /api/game_status/:id` - Player view of a game
/// - `GET /api/logs/:id` - Conversation log
/// - `POST /api/save_conversation/:id` - Write a transcript file
/// - `GET /api/active_games` - Stored games
/// - `GET /api/stats` - Per-diagnosis counters
/// - `GET /health` - Liveness
pub fn game_router(state: GameAppState) -> Router {
    Router::new()
        .route("/api/new_game", post(new_game))
        .route("/api/send_message", post(send_message))
        .route("/api/game_status/:id", get(game_status))
        .route("/api/logs/:id", get(game_logs))
        .route("/api/save_conversation/:id", post(save_conversation))
        .route("/api/active_games", get(active_games))
        .route("/api/stats", get(stats))
        .route("/health", get(health))
        .with_state(state)
}
