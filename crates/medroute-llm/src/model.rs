//! The [`GenerationModel`] trait and the Anthropic Messages API client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ModelError, Result};

/// A single generation request: one system prompt, one user turn.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "claude-sonnet-4-5").
    pub model: String,
    pub system: String,
    pub user_message: String,
    pub max_tokens: u32,
}

impl GenerateRequest {
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        user_message: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user_message: user_message.into(),
            max_tokens,
        }
    }
}

/// A service that can execute text-generation requests.
///
/// Implementations handle transport and authentication. The pipelines only
/// ever see this trait (usually behind [`RetryPolicy`](crate::RetryPolicy)),
/// so tests can substitute a scripted mock.
#[async_trait]
pub trait GenerationModel: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Execute a generation request and return the raw text response.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] on timeout, non-success status, missing
    /// configuration, or unusable payloads.
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;
}

/// Configuration for the Anthropic client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// Base URL of the API (override for testing).
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Hard wall-clock deadline per request, in seconds.
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".into(),
            api_key_env: "ANTHROPIC_API_KEY".into(),
            timeout_secs: 60,
        }
    }
}

/// Generation model backed by the Anthropic Messages API.
pub struct AnthropicClient {
    config: AnthropicConfig,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl AnthropicClient {
    /// Create a client; the API key is resolved from the environment
    /// variable named in the config at request time.
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            api_key: None,
        }
    }

    /// Create a client with an explicit API key (bypasses the environment).
    pub fn with_api_key(config: AnthropicConfig, api_key: String) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            api_key: Some(api_key),
        }
    }

    fn messages_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/v1/messages")
    }

    fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ModelError::NotConfigured(format!("set {} env var", self.config.api_key_env))
            })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [MessageTurn<'a>; 1],
}

#[derive(Serialize)]
struct MessageTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct TokenUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[async_trait]
impl GenerationModel for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let api_key = self.resolve_api_key()?;
        let url = self.messages_url();
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: [MessageTurn {
                role: "user",
                content: &request.user_message,
            }],
        };

        debug!(model = %request.model, max_tokens = request.max_tokens, "sending generation request");

        let start = Instant::now();
        let send = self
            .http
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send();

        let response = match tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            send,
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                warn!(
                    model = %request.model,
                    elapsed_ms,
                    limit_secs = self.config.timeout_secs,
                    "model timeout, no retry"
                );
                return Err(ModelError::Timeout);
            }
        };

        let status = response.status();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: String = text.chars().take(200).collect();
            warn!(model = %request.model, status = status.as_u16(), elapsed_ms, %body, "model error");
            return Err(ModelError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();

        if let Some(usage) = &parsed.usage {
            info!(
                model = %request.model,
                tokens_in = usage.input_tokens,
                tokens_out = usage.output_tokens,
                elapsed_ms,
                "model ok"
            );
        } else {
            info!(model = %request.model, elapsed_ms, "model ok");
        }

        Ok(text)
    }
}
