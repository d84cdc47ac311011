//! Judge gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Judge gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which gateway backs the judge
    #[serde(default)]
    pub provider: JudgeProvider,

    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key for the endpoint
    pub api_key: Option<SecretString>,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Judge gateway backend
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JudgeProvider {
    #[default]
    OpenAi,
    /// Canned replies, for local play without a model
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.is_empty())
    }

    /// Validate judge configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == JudgeProvider::Mock {
            return Ok(());
        }
        if self.api_key().is_none() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::MustBePositive("ai.timeout_secs"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: JudgeProvider::default(),
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> AiConfig {
        AiConfig {
            api_key: Some(SecretString::new(key.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, JudgeProvider::OpenAi);
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_validation_requires_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("AI__API_KEY"))
        );
        assert!(with_key("").validate().is_err());
        assert!(with_key("sk-xxx").validate().is_ok());
    }

    #[test]
    fn test_validation_requires_model() {
        let config = AiConfig {
            model: " ".to_string(),
            ..with_key("sk-xxx")
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__MODEL"))
        );
    }

    #[test]
    fn test_mock_provider_needs_no_key() {
        let config = AiConfig {
            provider: JudgeProvider::Mock,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_output_hides_key() {
        let rendered = format!("{:?}", with_key("sk-very-secret"));
        assert!(!rendered.contains("sk-very-secret"));
    }
}
