//! Chat-completion provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction for the hosted chat
//! service, allowing easy swapping between backends (Claude, mock).

pub mod claude;
pub mod mock;

pub use claude::{ClaudeConfig, ClaudeProvider};
pub use mock::MockChatProvider;

use crate::models::ChatMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Empty response from provider")]
    EmptyResponse,
}

/// Trait for chat-completion providers.
///
/// Implementations receive the full message list plus a single system
/// instruction (the role preamble with grounding context already
/// folded in) and return one assistant reply as plain text.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        system: &str,
    ) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
