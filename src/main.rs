//! Clinic Dialogue server binary.
//!
//! Loads configuration, wires the in-memory stores, the judge gateway and
//! the conversation logs into the game handlers, and serves the HTTP API.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clinic_dialogue::adapters::ai::{MockJudgeGateway, OpenAiCompatibleGateway, OpenAiGatewayConfig};
use clinic_dialogue::adapters::http::{game_router, with_middleware, GameAppState};
use clinic_dialogue::adapters::log::{
    FileConversationLog, InMemoryConversationLog, TeeConversationLog,
};
use clinic_dialogue::adapters::memory::{InMemorySessionStore, InMemoryStatsStore};
use clinic_dialogue::application::{
    CreateGameHandler, DedupCache, GetGameHandler, GetLogsHandler, GetStatsHandler, KeyedLocks,
    ListGamesHandler, SaveConversationHandler, SendMessageHandler,
};
use clinic_dialogue::config::{AiConfig, AppConfig, JudgeProvider, ServerConfig};
use clinic_dialogue::domain::dialogue::{DialogueEngine, RandomDiagnosisPicker, SymptomHintCache};
use clinic_dialogue::domain::foundation::{SessionId, Timestamp};
use clinic_dialogue::ports::{JudgeError, JudgeGateway, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let game = &config.game;
    let diseases = game.diseases_list();

    // ═══════════════════════════════════════════════════════════════════════
    // Ports
    // ═══════════════════════════════════════════════════════════════════════

    let gateway = build_gateway(&config.ai)?;
    let store = Arc::new(InMemorySessionStore::new());
    let stats = Arc::new(InMemoryStatsStore::seeded(diseases.clone()));
    let memory_log = Arc::new(InMemoryConversationLog::new());
    let log = Arc::new(TeeConversationLog::new(
        memory_log.clone(),
        Arc::new(FileConversationLog::new(&game.conversation_log_dir)),
    ));

    // ═══════════════════════════════════════════════════════════════════════
    // Engine and handlers
    // ═══════════════════════════════════════════════════════════════════════

    let engine = Arc::new(DialogueEngine::new(
        gateway,
        Arc::new(SymptomHintCache::new(game.symptom_cache_capacity)),
        game.dialogue_policy(),
    ));
    let locks: Arc<KeyedLocks<SessionId>> = Arc::new(KeyedLocks::new());

    let state = GameAppState {
        create_game: Arc::new(CreateGameHandler::new(
            store.clone(),
            engine.clone(),
            Arc::new(RandomDiagnosisPicker::new(diseases)),
            log.clone(),
            Arc::new(DedupCache::new(game.dedup_window_secs, game.dedup_capacity)),
        )),
        send_message: Arc::new(SendMessageHandler::new(
            store.clone(),
            stats.clone(),
            engine,
            log.clone(),
            locks.clone(),
        )),
        get_game: Arc::new(GetGameHandler::new(store.clone())),
        list_games: Arc::new(ListGamesHandler::new(store.clone())),
        get_logs: Arc::new(GetLogsHandler::new(store.clone(), log.clone())),
        get_stats: Arc::new(GetStatsHandler::new(stats)),
        save_conversation: Arc::new(SaveConversationHandler::new(
            store.clone(),
            log,
            &game.conversation_log_dir,
        )),
    };

    // ═══════════════════════════════════════════════════════════════════════
    // Idle session sweep
    // ═══════════════════════════════════════════════════════════════════════

    {
        let store = store.clone();
        let ttl = game.session_ttl();
        let mut ticker = tokio::time::interval(game.sweep_interval());
        tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let cutoff = Timestamp::now().minus_secs(ttl.as_secs());
                match store.purge_idle(cutoff).await {
                    Ok(evicted) => {
                        memory_log.forget(&evicted).await;
                        let pruned = locks.prune();
                        if !evicted.is_empty() {
                            info!(evicted = evicted.len(), pruned_locks = pruned, "Idle sessions swept");
                        }
                    }
                    Err(e) => warn!(error = %e, "Idle session sweep failed"),
                }
            }
        });
    }

    let app = with_middleware(game_router(state), &config);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, model = %config.ai.model, "Clinic dialogue server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn build_gateway(ai: &AiConfig) -> Result<Arc<dyn JudgeGateway>, JudgeError> {
    match ai.provider {
        JudgeProvider::OpenAi => {
            let config = OpenAiGatewayConfig::new(ai.api_key().unwrap_or_default())
                .with_model(ai.model.clone())
                .with_base_url(ai.base_url.clone())
                .with_timeout(ai.timeout());
            Ok(Arc::new(OpenAiCompatibleGateway::new(config)?))
        }
        JudgeProvider::Mock => {
            warn!("Using the mock judge gateway; replies are canned");
            Ok(Arc::new(MockJudgeGateway::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
