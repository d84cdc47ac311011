//! OpenAI-compatible Judge Gateway.
//!
//! Sends each judge request as a two-message chat completion (role context as
//! the system message, prompt as the user message) to any endpoint speaking
//! the OpenAI chat completions protocol.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiGatewayConfig::new(api_key)
//!     .with_model("deepseek-chat")
//!     .with_base_url("https://api.deepseek.com/v1");
//!
//! let gateway = OpenAiCompatibleGateway::new(config)?;
//! ```
//!
//! The gateway never retries. Failures are classified and handed back; the
//! caller decides whether to resend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::ports::{JudgeError, JudgeGateway, JudgeRequest};

/// Configuration for the OpenAI-compatible gateway.
#[derive(Debug, Clone)]
pub struct OpenAiGatewayConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiGatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct OpenAiCompatibleGateway {
    config: OpenAiGatewayConfig,
    client: Client,
}

impl OpenAiCompatibleGateway {
    /// # Errors
    ///
    /// `InvalidRequest` if the HTTP client cannot be built.
    pub fn new(config: OpenAiGatewayConfig) -> Result<Self, JudgeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| JudgeError::invalid_request(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_chat_request(&self, request: &JudgeRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(request.role_context.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(request.prompt.clone()),
                },
            ],
        }
    }

    async fn send(&self, request: &JudgeRequest) -> Result<Response, JudgeError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&self.to_chat_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JudgeError::timeout(self.config.timeout.as_secs() as u32)
                } else if e.is_connect() {
                    JudgeError::network(format!("Connection failed: {}", e))
                } else {
                    JudgeError::network(e.to_string())
                }
            })
    }
}

/// Maps a non-success HTTP status to a gateway error.
fn classify_status(status: u16, body: String) -> JudgeError {
    match status {
        401 | 403 => JudgeError::AuthenticationFailed,
        429 => JudgeError::rate_limited(parse_retry_after(&body)),
        400 => JudgeError::InvalidRequest(body),
        500..=599 => JudgeError::unavailable(format!("Server error {}: {}", status, body)),
        _ => JudgeError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" from a rate limit body, 30 if absent.
fn parse_retry_after(body: &str) -> u32 {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string));
    message
        .as_deref()
        .and_then(|m| m.split("try again in ").nth(1))
        .map(|rest| rest.chars().take_while(|c| c.is_ascii_digit()).collect::<String>())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(30)
}

/// Pulls the first choice's text out of a completion body.
fn extract_content(response: ChatResponse) -> Result<String, JudgeError> {
    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| JudgeError::parse("No choices in response"))?
        .message
        .content
        .ok_or_else(|| JudgeError::parse("Choice has no content"))
}

#[async_trait]
impl JudgeGateway for OpenAiCompatibleGateway {
    async fn invoke(&self, request: JudgeRequest) -> Result<String, JudgeError> {
        debug!(
            task = %request.task,
            session_id = ?request.session_id.map(|id| id.to_string()),
            model = %self.config.model,
            "Invoking judge"
        );
        let response = self.send(&request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_status(status.as_u16(), body);
            warn!(task = %request.task, status = status.as_u16(), error = %err, "Judge call failed");
            return Err(err);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| JudgeError::parse(format!("Failed to parse response: {}", e)))?;
        extract_content(body)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
