//! Chat turns.
//!
//! A [`ChatTurn`] is one committed message in the conversation, tagged with
//! the role that produced it. Turns are immutable once created.

use serde::{Deserialize, Serialize};

/// Greeting the assistant opens every conversation with.
pub const GREETING: &str = "Hi, how can I help you today?";

/// Assistant text shown in place of a reply when the request fails.
pub const FAILURE_MESSAGE: &str = "❌ Failed to send message";

/// Role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message.
    User,
    /// Assistant (remote service) response.
    Assistant,
}

impl Role {
    /// Short label used by the transcript view.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Assistant => "bot",
        }
    }
}

/// A single committed turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    role: Role,
    content: String,
}

impl ChatTurn {
    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// The greeting that seeds every conversation.
    pub fn greeting() -> Self {
        Self::assistant(GREETING)
    }

    /// The assistant turn appended when a request fails.
    pub fn failure() -> Self {
        Self::assistant(FAILURE_MESSAGE)
    }

    /// Who produced this turn.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The text of this turn.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether this turn was written by the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Whether this is the fixed failure turn.
    pub fn is_failure(&self) -> bool {
        self.role == Role::Assistant && self.content == FAILURE_MESSAGE
    }
}
