//! Chat widget handlers.
//!
//! Each endpoint renders the full widget fragment; the page swaps it in
//! place via hx-swap. Session state goes through `tower_sessions` so
//! refreshing the page keeps the latest exchange.

use crate::assistant::{submit_message, AssistantSession, QuickAction, SubmitOutcome};
use crate::models::{ChatMessage, RecommendationSet, UserPreferences};
use crate::services::metrics::record_chat_outcome;
use crate::AppState;
use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Form;
use chrono::Local;
use serde::Deserialize;
use tower_sessions::Session;

pub const ASSISTANT_SESSION_KEY: &str = "assistant";
pub const RECOMMENDATIONS_SESSION_KEY: &str = "recommendations";
pub const PREFERENCES_SESSION_KEY: &str = "preferences";

const DEGRADED_NOTICE: &str =
    "AI Assistant is currently unavailable. Please check your API configuration.";

#[derive(Template)]
#[template(path = "chat_widget.html")]
pub struct ChatWidgetTemplate {
    pub history: Vec<ChatMessage>,
    pub available: bool,
    pub notice: Option<String>,
    pub warning: Option<String>,
    pub actions: &'static [QuickAction],
}

impl ChatWidgetTemplate {
    fn from_session(session: &AssistantSession, available: bool) -> Self {
        Self {
            history: session.history.clone(),
            available,
            notice: (!available).then(|| DEGRADED_NOTICE.to_string()),
            warning: None,
            actions: &QuickAction::ALL,
        }
    }

    fn with_warning(mut self, warning: &str) -> Self {
        self.warning = Some(warning.to_string());
        self
    }
}

#[derive(Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// Load the per-session assistant state, creating it on first use, and
/// merge in whatever recommendations the session currently shows.
async fn load_assistant(session: &Session) -> AssistantSession {
    let mut assistant: AssistantSession = session
        .get(ASSISTANT_SESSION_KEY)
        .await
        .unwrap_or_default()
        .unwrap_or_else(|| AssistantSession::new(Local::now()));

    let recommendations: RecommendationSet = session
        .get(RECOMMENDATIONS_SESSION_KEY)
        .await
        .unwrap_or_default()
        .unwrap_or_default();
    let preferences: UserPreferences = session
        .get(PREFERENCES_SESSION_KEY)
        .await
        .unwrap_or_default()
        .unwrap_or_default();
    assistant.merge_context(&recommendations, &preferences);
    assistant
}

async fn save_assistant(session: &Session, assistant: &AssistantSession) {
    if let Err(err) = session.insert(ASSISTANT_SESSION_KEY, assistant).await {
        tracing::error!(error = %err, "failed to persist chat session");
    }
}

/// GET /chat: render the widget in its current state.
pub async fn chat_widget(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let assistant = load_assistant(&session).await;
    let available = state.chat.is_available().await;
    ChatWidgetTemplate::from_session(&assistant, available)
}

/// POST /chat/message: run one exchange and re-render the widget.
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> impl IntoResponse {
    run_exchange(&state, &session, &form.message).await
}

/// POST /chat/action/{action}: submit a quick action's canned prompt
/// through the normal message path.
pub async fn quick_action(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> axum::response::Response {
    let Some(action) = QuickAction::from_slug(&slug) else {
        return (StatusCode::NOT_FOUND, "unknown quick action").into_response();
    };
    run_exchange(&state, &session, action.prompt())
        .await
        .into_response()
}

/// POST /chat/retry: attempt to bring the provider back, then render.
pub async fn retry_provider(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let assistant = load_assistant(&session).await;
    match state.chat.reconnect().await {
        Ok(()) => ChatWidgetTemplate::from_session(&assistant, true),
        Err(err) => {
            tracing::warn!(error = %err, "chat provider retry failed");
            ChatWidgetTemplate::from_session(&assistant, false)
        }
    }
}

async fn run_exchange(state: &AppState, session: &Session, message: &str) -> ChatWidgetTemplate {
    let mut assistant = load_assistant(session).await;

    let Some(provider) = state.chat.provider().await else {
        record_chat_outcome("degraded");
        return ChatWidgetTemplate::from_session(&assistant, false);
    };

    match submit_message(provider.as_ref(), &mut assistant, message).await {
        SubmitOutcome::Replied => {
            record_chat_outcome("replied");
            save_assistant(session, &assistant).await;
            ChatWidgetTemplate::from_session(&assistant, true)
        }
        SubmitOutcome::Rejected(warning) => {
            record_chat_outcome("rejected");
            ChatWidgetTemplate::from_session(&assistant, true).with_warning(warning)
        }
    }
}
