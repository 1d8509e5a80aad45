//! Conversation types shared by the session store, classifier, and agents.

use serde::{Deserialize, Serialize};

/// Who produced a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One typed piece of message content.
///
/// `Text` is the common case. `Json` carries structured payloads; when such
/// a payload has a string `"text"` field it is treated as text-bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentPart {
    Text(String),
    Json(serde_json::Value),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }
}

/// A single exchange entry: a role plus an ordered list of content parts.
///
/// Messages are immutable once appended to a session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ConversationMessage {
    /// Build a single-part user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::text(text)],
        }
    }

    /// Build a single-part assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentPart::text(text)],
        }
    }

    /// Concatenate the text of every text-bearing part, in order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for part in &self.content {
            match part {
                ContentPart::Text(text) => out.push_str(text),
                ContentPart::Json(value) => {
                    if let Some(text) = value.get("text").and_then(|v| v.as_str()) {
                        out.push_str(text);
                    }
                }
            }
        }
        out
    }
}
