//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CLINIC` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use clinic_dialogue::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod game;
mod server;

pub use ai::{AiConfig, JudgeProvider};
pub use error::{ConfigError, ValidationError};
pub use game::GameConfig;
pub use server::{Environment, ServerConfig};

use std::time::Duration;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Judge gateway configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Game rules and session lifecycle
    #[serde(default)]
    pub game: GameConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CLINIC` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CLINIC__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLINIC__GAME__MAX_TURNS=10` -> `game.max_turns = 10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLINIC")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// HTTP request timeout: the configured value, raised to cover the
    /// slowest possible turn (every judge call hitting the gateway timeout).
    pub fn request_timeout(&self) -> Duration {
        let worst_turn = self.ai.timeout() * self.game.dialogue_policy().max_judge_calls_per_turn();
        Duration::from_secs(self.server.request_timeout_secs).max(worst_turn)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.game.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
