//! Session-scoped chat manager for the embedded assistant widget.
//!
//! Owns the per-session state bag, the grounding-context assembly, the
//! quick-action catalog, and the submission path that talks to the
//! chat-completion provider. Rendering is left to the handlers and
//! templates; everything here is testable without a running server.

pub mod context;
pub mod policy;
pub mod session;

pub use context::{ContextSnapshot, NO_CONTEXT_SENTINEL};
pub use session::AssistantSession;

use crate::models::{ChatMessage, Role};
use crate::services::providers::ChatProvider;
use chrono::Local;

/// Role preamble for every grounded chat request.
const SYSTEM_PREAMBLE: &str = "\
You are an AI assistant integrated into an entertainment recommendation application. \
You help users discover and explore venues based on their personalized taste profiles.

Your role is to:
- Help users understand their recommendations
- Answer questions about specific venues
- Provide insights about taste preferences
- Suggest ways to refine search filters
- Explain why certain venues were recommended

Guidelines:
- Be conversational, helpful, and enthusiastic
- Keep responses concise but informative (2-3 sentences typically)
- If asked about venues not in the current recommendations, politely redirect to available options
- Focus on actionable advice and insights
- If no recommendations are available, encourage the user to get recommendations first";

/// Assemble the full system instruction for a grounded request.
pub fn system_prompt(context: &str) -> String {
    format!("{}\n\nCurrent context:\n{}", SYSTEM_PREAMBLE, context)
}

/// The four fixed quick-action triggers. Activating one submits its
/// canned prompt through the normal message path; there is no separate
/// code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    ExplainRecommendations,
    ImproveResults,
    TopVenue,
    SuggestFilters,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::ExplainRecommendations,
        QuickAction::ImproveResults,
        QuickAction::TopVenue,
        QuickAction::SuggestFilters,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "explain_recommendations" => Some(Self::ExplainRecommendations),
            "improve_results" => Some(Self::ImproveResults),
            "top_venue" => Some(Self::TopVenue),
            "suggest_filters" => Some(Self::SuggestFilters),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::ExplainRecommendations => "explain_recommendations",
            Self::ImproveResults => "improve_results",
            Self::TopVenue => "top_venue",
            Self::SuggestFilters => "suggest_filters",
        }
    }

    /// Button label in the widget.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExplainRecommendations => "Explain my recommendations",
            Self::ImproveResults => "Improve my results",
            Self::TopVenue => "Tell me about top venue",
            Self::SuggestFilters => "Suggest new filters",
        }
    }

    /// The canned prompt the action submits.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::ExplainRecommendations => {
                "Can you explain why these venues were recommended for me?"
            }
            Self::ImproveResults => "How can I improve my recommendation results?",
            Self::TopVenue => "Tell me more about the top recommended venue.",
            Self::SuggestFilters => "Can you suggest better filter settings for me?",
        }
    }
}

/// Result of a submission attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// History now holds the user message plus one assistant reply.
    Replied,
    /// Validation failed; no state was mutated. Carries the warning to
    /// show inline.
    Rejected(&'static str),
}

/// Submit a message through the full exchange path.
///
/// Validates first (rejection mutates nothing), appends the user turn,
/// then calls the provider with the single current message plus the
/// grounded system instruction. A response that trips the failure
/// heuristic triggers exactly one simplified retry without grounding
/// context; a hard error is replaced with the fixed fallback reply.
/// Exactly one assistant message is appended in every non-rejected
/// outcome.
pub async fn submit_message(
    provider: &dyn ChatProvider,
    session: &mut AssistantSession,
    raw_input: &str,
) -> SubmitOutcome {
    let message = match policy::validate_message(raw_input) {
        Ok(trimmed) => trimmed.to_string(),
        Err(warning) => return SubmitOutcome::Rejected(warning),
    };

    session.push_user(message.clone(), Local::now());

    // Single conversation approach: only the current message is sent,
    // grounding comes from the context string.
    let outgoing = [ChatMessage::new(Role::User, message, Local::now())];
    let context = session.context.to_context_string();
    let system = system_prompt(&context);

    let reply = match provider.complete(&outgoing, &system).await {
        Ok(response) if policy::response_looks_failed(&response) => {
            tracing::warn!(
                session_id = %session.session_id,
                "response looked like a transient failure, retrying without context"
            );
            crate::services::metrics::record_chat_retry();
            match provider
                .complete(&outgoing, policy::GENERIC_SYSTEM_INSTRUCTION)
                .await
            {
                Ok(retry_response) => retry_response,
                Err(e) => {
                    tracing::error!(session_id = %session.session_id, error = %e, "chat retry failed");
                    crate::services::metrics::record_chat_fallback();
                    policy::FALLBACK_ASSISTANT_MESSAGE.to_string()
                }
            }
        }
        Ok(response) => response,
        Err(e) => {
            tracing::error!(session_id = %session.session_id, error = %e, "chat completion failed");
            crate::services::metrics::record_chat_fallback();
            policy::FALLBACK_ASSISTANT_MESSAGE.to_string()
        }
    };

    session.push_assistant(reply, Local::now());
    SubmitOutcome::Replied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecommendationSet, UserPreferences, Venue};
    use crate::services::providers::{MockChatProvider, ProviderError};
    use std::collections::BTreeMap;

    fn session_with_context() -> AssistantSession {
        let mut session = AssistantSession::new(Local::now());
        let mut venue = Venue::new("Cafe A", "restaurant");
        venue.rating = Some(4.5);
        venue.price_level = Some("$$".to_string());
        let mut filters = BTreeMap::new();
        filters.insert("budget".to_string(), "$$".to_string());
        filters.insert("category".to_string(), "restaurant".to_string());
        session.merge_context(
            &RecommendationSet::new(vec![venue], filters),
            &UserPreferences::default(),
        );
        session
    }

    #[tokio::test]
    async fn rejected_input_leaves_history_unchanged() {
        let provider = MockChatProvider::new(true);
        let mut session = session_with_context();
        let outcome = submit_message(&provider, &mut session, " a ").await;
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(session.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn successful_exchange_appends_pair() {
        let provider = MockChatProvider::new(true);
        provider.push_response(Ok("Because it fits your budget.".to_string()));
        let mut session = session_with_context();
        let outcome = submit_message(&provider, &mut session, "Why this place?").await;
        assert_eq!(outcome, SubmitOutcome::Replied);
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].content, "Why this place?");
        assert_eq!(session.history[1].content, "Because it fits your budget.");
    }

    #[tokio::test]
    async fn grounding_context_reaches_provider() {
        let provider = MockChatProvider::new(true);
        provider.push_response(Ok("ok then".to_string()));
        let mut session = session_with_context();
        submit_message(&provider, &mut session, "Why this place?").await;
        let systems = provider.seen_systems();
        assert_eq!(systems.len(), 1);
        assert!(systems[0].contains("Cafe A: 4.5 stars, $$ price level"));
        assert!(systems[0].contains("budget: $$"));
        assert!(systems[0].contains("category: restaurant"));
    }

    #[tokio::test]
    async fn apologetic_response_triggers_generic_retry() {
        let provider = MockChatProvider::new(true);
        provider.push_response(Ok(
            "I'm having trouble connecting to the AI service.".to_string()
        ));
        provider.push_response(Ok("A simpler answer.".to_string()));
        let mut session = session_with_context();
        submit_message(&provider, &mut session, "Why this place?").await;
        let systems = provider.seen_systems();
        assert_eq!(systems.len(), 2);
        assert_eq!(systems[1], policy::GENERIC_SYSTEM_INSTRUCTION);
        assert_eq!(session.history[1].content, "A simpler answer.");
    }

    #[tokio::test]
    async fn hard_failure_substitutes_fallback_message() {
        let provider = MockChatProvider::new(true);
        provider.push_response(Err(ProviderError::NetworkError("boom".to_string())));
        let mut session = session_with_context();
        let outcome = submit_message(&provider, &mut session, "Why this place?").await;
        assert_eq!(outcome, SubmitOutcome::Replied);
        assert_eq!(session.history.len(), 2);
        assert_eq!(
            session.history[1].content,
            policy::FALLBACK_ASSISTANT_MESSAGE
        );
    }

    #[tokio::test]
    async fn failed_retry_also_falls_back() {
        let provider = MockChatProvider::new(true);
        provider.push_response(Ok("error".to_string()));
        provider.push_response(Err(ProviderError::RateLimited));
        let mut session = session_with_context();
        submit_message(&provider, &mut session, "Why this place?").await;
        assert_eq!(
            session.history[1].content,
            policy::FALLBACK_ASSISTANT_MESSAGE
        );
    }

    #[test]
    fn quick_action_prompts_are_fixed() {
        assert_eq!(
            QuickAction::ExplainRecommendations.prompt(),
            "Can you explain why these venues were recommended for me?"
        );
        assert_eq!(
            QuickAction::from_slug("top_venue"),
            Some(QuickAction::TopVenue)
        );
        assert_eq!(QuickAction::from_slug("unknown"), None);
    }

    #[test]
    fn quick_action_slugs_round_trip() {
        for action in QuickAction::ALL {
            assert_eq!(QuickAction::from_slug(action.slug()), Some(action));
        }
    }

    #[test]
    fn system_prompt_embeds_context() {
        let prompt = system_prompt("the context");
        assert!(prompt.starts_with("You are an AI assistant"));
        assert!(prompt.ends_with("Current context:\nthe context"));
    }
}
