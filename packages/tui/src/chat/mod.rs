use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a transcript turn. Matches the wire contract of the
/// chat endpoint (`user` / `assistant`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the conversation. Only `role` and `content` travel over
/// the wire; the timestamp is local display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    #[serde(skip_serializing, default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content.into())
    }

    fn new(role: ChatRole, content: String) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    /// Display-friendly author label.
    pub fn author_label(&self) -> &'static str {
        match self.role {
            ChatRole::User => "You",
            ChatRole::Assistant => "Assistant",
        }
    }

    /// Whether this is a failure annotation injected into the transcript.
    pub fn is_error(&self) -> bool {
        self.role == ChatRole::Assistant && self.content.starts_with("Error:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_turn_constructors() {
        let turn = ChatTurn::user("Met Dr. Smith today");
        assert_eq!(turn.role, ChatRole::User);
        assert_eq!(turn.author_label(), "You");

        let turn = ChatTurn::assistant("Got it, what products?");
        assert_eq!(turn.role, ChatRole::Assistant);
        assert_eq!(turn.author_label(), "Assistant");
    }

    #[test]
    fn test_wire_shape_is_role_and_content_only() {
        let turn = ChatTurn::user("hi");
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_error_turn_detection() {
        assert!(ChatTurn::assistant("Error: connection refused").is_error());
        assert!(!ChatTurn::assistant("All good").is_error());
        assert!(!ChatTurn::user("Error: typed by the user").is_error());
    }
}
