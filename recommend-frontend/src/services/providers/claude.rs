//! Claude provider implementation.
//!
//! Implements chat completion against the Anthropic Messages API.

use super::{ChatProvider, ProviderError};
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Anthropic Messages API base URL.
const CLAUDE_API_BASE: &str = "https://api.anthropic.com/v1";

/// API version header required by the Messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude provider configuration.
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Claude chat provider.
pub struct ClaudeProvider {
    config: ClaudeConfig,
    client: Client,
}

impl ClaudeProvider {
    /// Construct the provider, failing fast when no API key is set so
    /// the caller can degrade the widget instead of erroring later.
    pub fn new(config: ClaudeConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Claude API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn to_wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ChatProvider for ClaudeProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        system: &str,
    ) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: system.to_string(),
            messages: Self::to_wire_messages(messages),
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            system_len = system.len(),
            "Sending request to Claude API"
        );

        let response = self
            .client
            .post(format!("{}/messages", CLAUDE_API_BASE))
            .header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Claude API error {}: {}",
                status, error_text
            )));
        }

        let api_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        api_response
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
            })
            .ok_or(ProviderError::EmptyResponse)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        // The Messages endpoint has no cheap ping; a configured key and
        // a constructible client are the only local checks available.
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Claude API key not configured".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Claude API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}
