//! HTTP handlers for game endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    CreateGameCommand, CreateGameHandler, GetGameHandler, GetGameQuery, GetLogsHandler,
    GetLogsQuery, GetStatsHandler, ListGamesHandler, SaveConversationCommand, SaveConversationHandler,
    SendMessageCommand, SendMessageHandler,
};
use crate::domain::dialogue::GameError;
use crate::domain::foundation::{SessionId, Timestamp};

use super::dto::{
    ActiveGamesResponse, ErrorResponse, GameStateResponse, HealthResponse, LogsResponse,
    SaveConversationResponse, SendMessageRequest, StatsResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct GameAppState {
    pub create_game: Arc<CreateGameHandler>,
    pub send_message: Arc<SendMessageHandler>,
    pub get_game: Arc<GetGameHandler>,
    pub list_games: Arc<ListGamesHandler>,
    pub get_logs: Arc<GetLogsHandler>,
    pub get_stats: Arc<GetStatsHandler>,
    pub save_conversation: Arc<SaveConversationHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/new_game - Start a game (duplicates within the window share one)
pub async fn new_game(State(state): State<GameAppState>, headers: HeaderMap) -> Response {
    let cmd = CreateGameCommand {
        client_identity: client_identity(&headers),
        requested_at: Timestamp::now(),
    };

    match state.create_game.handle(cmd).await {
        Ok(result) => {
            let response: GameStateResponse = result.view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// POST /api/send_message - Submit a doctor utterance
pub async fn send_message(
    State(state): State<GameAppState>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let game_id = match parse_game_id(&req.game_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = SendMessageCommand {
        game_id,
        message: req.message,
    };

    match state.send_message.handle(cmd).await {
        Ok(result) => {
            let response: GameStateResponse = result.view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// GET /api/game_status/:id - Player view of a game
pub async fn game_status(
    State(state): State<GameAppState>,
    Path(game_id): Path<String>,
) -> Response {
    let game_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.get_game.handle(GetGameQuery { game_id }).await {
        Ok(view) => {
            let response: GameStateResponse = view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// GET /api/logs/:id - Conversation log of a game
pub async fn game_logs(State(state): State<GameAppState>, Path(game_id): Path<String>) -> Response {
    let game_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.get_logs.handle(GetLogsQuery { game_id }).await {
        Ok(entries) => {
            let response = LogsResponse {
                logs: entries.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// POST /api/save_conversation/:id - Write a transcript file for a game
pub async fn save_conversation(
    State(state): State<GameAppState>,
    Path(game_id): Path<String>,
) -> Response {
    let game_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = SaveConversationCommand {
        game_id,
        requested_at: Timestamp::now(),
    };

    match state.save_conversation.handle(cmd).await {
        Ok(result) => {
            let response = SaveConversationResponse {
                filename: result.filename,
                message: "对话已保存".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// GET /api/active_games - Summaries of stored games
pub async fn active_games(State(state): State<GameAppState>) -> Response {
    match state.list_games.handle().await {
        Ok(games) => {
            let response = ActiveGamesResponse {
                games: games.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// GET /api/stats - Per-diagnosis counters
pub async fn stats(State(state): State<GameAppState>) -> Response {
    match state.get_stats.handle().await {
        Ok(rows) => {
            let response = StatsResponse {
                stats: rows.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_game_error(e),
    }
}

/// GET /health - Liveness
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Request helpers
// ════════════════════════════════════════════════════════════════════════════

/// `x-client-id`, else the first `x-forwarded-for` hop, else `user-agent`.
pub fn client_identity(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header("x-client-id")
        .or_else(|| {
            header("x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .or_else(|| header("user-agent"))
        .unwrap_or("anonymous")
        .to_string()
}

/// Malformed ids cannot name a stored game.
fn parse_game_id(raw: &str) -> Result<SessionId, Response> {
    raw.trim().parse::<SessionId>().map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(format!("Game not found: {}", raw))),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_game_error(error: GameError) -> Response {
    let status = match &error {
        GameError::NotFound(_) => StatusCode::NOT_FOUND,
        GameError::AlreadyOver
        | GameError::WrongTurn
        | GameError::TooLong { .. }
        | GameError::EmptyMessage => StatusCode::BAD_REQUEST,
        GameError::JudgeTransient(_) => StatusCode::SERVICE_UNAVAILABLE,
        GameError::JudgeFatal(_) => StatusCode::BAD_GATEWAY,
        GameError::Storage(_) | GameError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::from(&error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    mod errors {
        use super::*;

        #[test]
        fn not_found_maps_to_404() {
            let response = handle_game_error(GameError::NotFound(SessionId::new()));
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        #[test]
        fn player_mistakes_map_to_400() {
            for error in [
                GameError::AlreadyOver,
                GameError::WrongTurn,
                GameError::EmptyMessage,
                GameError::too_long(100, 101),
            ] {
                assert_eq!(handle_game_error(error).status(), StatusCode::BAD_REQUEST);
            }
        }

        #[test]
        fn judge_failures_map_to_gateway_statuses() {
            assert_eq!(
                handle_game_error(GameError::JudgeTransient("x".into())).status(),
                StatusCode::SERVICE_UNAVAILABLE
            );
            assert_eq!(
                handle_game_error(GameError::JudgeFatal("x".into())).status(),
                StatusCode::BAD_GATEWAY
            );
        }

        #[test]
        fn storage_maps_to_500() {
            assert_eq!(
                handle_game_error(GameError::storage("down")).status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    mod identity {
        use super::*;

        fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
            let mut map = HeaderMap::new();
            for (name, value) in pairs {
                map.insert(*name, HeaderValue::from_static(value));
            }
            map
        }

        #[test]
        fn prefers_explicit_client_id() {
            let h = headers(&[
                ("x-client-id", "browser-1"),
                ("x-forwarded-for", "1.2.3.4"),
                ("user-agent", "curl"),
            ]);
            assert_eq!(client_identity(&h), "browser-1");
        }

        #[test]
        fn falls_back_to_first_forwarded_hop() {
            let h = headers(&[("x-forwarded-for", "1.2.3.4, 10.0.0.1"), ("user-agent", "curl")]);
            assert_eq!(client_identity(&h), "1.2.3.4");
        }

        #[test]
        fn falls_back_to_user_agent_then_anonymous() {
            assert_eq!(client_identity(&headers(&[("user-agent", "curl/8")])), "curl/8");
            assert_eq!(client_identity(&HeaderMap::new()), "anonymous");
        }
    }
}
