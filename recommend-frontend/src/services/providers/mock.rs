//! Mock provider implementation for testing.

use super::{ChatProvider, ProviderError};
use crate::models::ChatMessage;
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock chat provider for testing.
///
/// Replays a scripted sequence of responses; once the script runs out
/// it echoes the last user message. Records every system instruction
/// it was called with so tests can assert on the grounding context.
pub struct MockChatProvider {
    enabled: bool,
    responses: Mutex<Vec<Result<String, ProviderError>>>,
    seen_systems: Mutex<Vec<String>>,
}

impl MockChatProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            responses: Mutex::new(Vec::new()),
            seen_systems: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response; queued responses are returned in order.
    pub fn push_response(&self, response: Result<String, ProviderError>) {
        self.responses.lock().unwrap().push(response);
    }

    /// System instructions seen so far, oldest first.
    pub fn seen_systems(&self) -> Vec<String> {
        self.seen_systems.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen_systems.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        system: &str,
    ) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock chat provider not enabled".to_string(),
            ));
        }

        self.seen_systems.lock().unwrap().push(system.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            let last = messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(format!("Mock response for: {}", last))
        } else {
            responses.remove(0)
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock chat provider not enabled".to_string(),
            ))
        }
    }
}
