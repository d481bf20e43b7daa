//! Chat provider lifecycle.
//!
//! Owns the live provider handle shared by every session. When the
//! provider cannot be constructed (missing key, bad config) the
//! service runs degraded: the widget stays visible with a notice and
//! no upstream calls are made until a retry succeeds.

use crate::config::AssistantSettings;
use crate::services::providers::{ChatProvider, ClaudeProvider, ProviderError};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct ChatService {
    settings: AssistantSettings,
    provider: RwLock<Option<Arc<dyn ChatProvider>>>,
}

impl ChatService {
    /// Builds the service, attempting an initial provider connection.
    /// Construction failure degrades the service instead of failing
    /// startup.
    pub fn new(settings: AssistantSettings) -> Self {
        let provider = match ClaudeProvider::new(settings.clone().into()) {
            Ok(p) => Some(Arc::new(p) as Arc<dyn ChatProvider>),
            Err(err) => {
                tracing::warn!(error = %err, "chat provider unavailable, running degraded");
                None
            }
        };
        Self {
            settings,
            provider: RwLock::new(provider),
        }
    }

    /// Test constructor wrapping an already-built provider.
    pub fn with_provider(settings: AssistantSettings, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            settings,
            provider: RwLock::new(Some(provider)),
        }
    }

    pub async fn is_available(&self) -> bool {
        self.provider.read().await.is_some()
    }

    /// Current provider handle, if any.
    pub async fn provider(&self) -> Option<Arc<dyn ChatProvider>> {
        self.provider.read().await.clone()
    }

    /// Drops the current handle and attempts a fresh connection.
    pub async fn reconnect(&self) -> Result<(), ProviderError> {
        let mut guard = self.provider.write().await;
        match ClaudeProvider::new(self.settings.clone().into()) {
            Ok(p) => {
                let p: Arc<dyn ChatProvider> = Arc::new(p);
                p.health_check().await?;
                *guard = Some(p);
                tracing::info!("chat provider reconnected");
                Ok(())
            }
            Err(err) => {
                *guard = None;
                Err(err)
            }
        }
    }

    /// Marks the provider unusable after a hard failure.
    pub async fn mark_degraded(&self) {
        let mut guard = self.provider.write().await;
        if guard.take().is_some() {
            tracing::warn!("chat provider marked degraded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockChatProvider;

    fn settings() -> AssistantSettings {
        AssistantSettings {
            api_key: secrecy::Secret::new(String::new()),
            model: "test-model".to_string(),
            max_tokens: 64,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn empty_key_degrades_instead_of_panicking() {
        let service = ChatService::new(settings());
        assert!(!service.is_available().await);
        assert!(service.provider().await.is_none());
    }

    #[tokio::test]
    async fn reconnect_with_empty_key_stays_degraded() {
        let service = ChatService::new(settings());
        assert!(service.reconnect().await.is_err());
        assert!(!service.is_available().await);
    }

    #[tokio::test]
    async fn injected_provider_is_available() {
        let service =
            ChatService::with_provider(settings(), Arc::new(MockChatProvider::new(true)));
        assert!(service.is_available().await);
        service.mark_degraded().await;
        assert!(!service.is_available().await);
    }
}
