//! Per-browser-session assistant state.
//!
//! The session keeps a single conversation exchange rather than an
//! accumulating transcript: a new user message clears whatever came
//! before, and an assistant reply keeps only the latest user message
//! plus itself. History length is therefore always 0, 1, or 2.

use crate::assistant::context::ContextSnapshot;
use crate::models::{ChatMessage, RecommendationSet, Role, UserPreferences};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Serializable per-session state bag for the chat widget.
///
/// Deliberately holds no client handle; the provider lives in shared
/// application state so this struct stays a plain value that pure
/// update functions can be tested against without a running server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSession {
    pub history: Vec<ChatMessage>,
    pub context: ContextSnapshot,
    /// Opaque label derived from the creation timestamp. Not a security
    /// token and not unique across processes.
    pub session_id: String,
}

impl AssistantSession {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            history: Vec::new(),
            context: ContextSnapshot::default(),
            session_id: at.format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// Overwrite the context cache with the recommendations and
    /// preferences currently on screen.
    pub fn merge_context(
        &mut self,
        recommendations: &RecommendationSet,
        preferences: &UserPreferences,
    ) {
        self.context = ContextSnapshot::from_parts(recommendations, preferences);
    }

    /// Append a user message, discarding any previous exchange.
    pub fn push_user(&mut self, content: impl Into<String>, at: DateTime<Local>) {
        self.history = vec![ChatMessage::new(Role::User, content, at)];
    }

    /// Append an assistant reply, keeping only the latest user message
    /// and this reply.
    pub fn push_assistant(&mut self, content: impl Into<String>, at: DateTime<Local>) {
        let reply = ChatMessage::new(Role::Assistant, content, at);
        match self.history.last() {
            Some(last) if last.role == Role::User => {
                self.history = vec![last.clone(), reply];
            }
            _ => {
                self.history = vec![reply];
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap()
    }

    #[test]
    fn session_id_is_timestamp_derived() {
        let session = AssistantSession::new(at());
        assert_eq!(session.session_id, "20260314_150926");
    }

    #[test]
    fn new_session_is_empty() {
        let session = AssistantSession::new(at());
        assert!(session.is_empty());
        assert!(session.context.is_empty());
    }

    #[test]
    fn user_message_clears_previous_exchange() {
        let mut session = AssistantSession::new(at());
        session.push_user("first question", at());
        session.push_assistant("first answer", at());
        session.push_user("second question", at());
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].content, "second question");
        assert_eq!(session.history[0].role, Role::User);
    }

    #[test]
    fn assistant_reply_keeps_latest_pair() {
        let mut session = AssistantSession::new(at());
        session.push_user("question", at());
        session.push_assistant("answer", at());
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].role, Role::User);
        assert_eq!(session.history[1].role, Role::Assistant);
    }

    #[test]
    fn history_never_exceeds_two() {
        let mut session = AssistantSession::new(at());
        for i in 0..5 {
            session.push_user(format!("q{}", i), at());
            session.push_assistant(format!("a{}", i), at());
            assert!(session.history.len() <= 2);
        }
        assert_eq!(session.history[0].content, "q4");
        assert_eq!(session.history[1].content, "a4");
    }

    #[test]
    fn assistant_without_user_stands_alone() {
        let mut session = AssistantSession::new(at());
        session.push_assistant("unsolicited", at());
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].role, Role::Assistant);
    }

    #[test]
    fn merge_context_overwrites_prior_values() {
        let mut session = AssistantSession::new(at());
        let mut first = RecommendationSet::default();
        first
            .filters
            .insert("budget".to_string(), "$".to_string());
        session.merge_context(&first, &UserPreferences::default());

        let mut second = RecommendationSet::default();
        second
            .filters
            .insert("budget".to_string(), "$$$".to_string());
        session.merge_context(&second, &UserPreferences::default());

        assert_eq!(
            session.context.filters.get("budget").map(String::as_str),
            Some("$$$")
        );
    }

    #[test]
    fn session_round_trips_through_serde() {
        let mut session = AssistantSession::new(at());
        session.push_user("question", at());
        let json = serde_json::to_string(&session).unwrap();
        let back: AssistantSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.history.len(), 1);
        assert_eq!(back.session_id, session.session_id);
    }
}
