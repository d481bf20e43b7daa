use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name used by the chat-completion API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in the widget transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Display label only, minute granularity.
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>, at: DateTime<Local>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: at.format("%H:%M").to_string(),
        }
    }
}
