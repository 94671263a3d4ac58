//! Conversation messages and per-session conversation state.
//!
//! One `Conversation` is the unit the checkpointer stores: the full ordered
//! message history for a session, serialized as JSON.
//!
//! **Interaction**: `TutorGraph` appends to a `Conversation` and hands the
//! message slice to `LlmClient::invoke`; `Checkpointer` implementations
//! persist it keyed by session identifier.

use serde::{Deserialize, Serialize};

/// One message in a tutoring conversation: system instruction, user prompt,
/// or assistant reply. Plain text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    /// The text content, regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System(s) | Self::User(s) | Self::Assistant(s) => s,
        }
    }
}

/// Ordered message history for one session.
///
/// Owned by the checkpoint store between invocations; the graph loads it,
/// appends the new turn, and saves it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

impl Conversation {
    /// A fresh conversation seeded with the given system prompt.
    pub fn with_system_prompt(prompt: &str) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Number of messages, including the system prompt.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Role constructors produce the matching variant and content() returns the text.
    #[test]
    fn message_constructors_and_content() {
        assert_eq!(Message::system("s"), Message::System("s".into()));
        assert_eq!(Message::user("u"), Message::User("u".into()));
        assert_eq!(Message::assistant("a"), Message::Assistant("a".into()));
        assert_eq!(Message::user("hello").content(), "hello");
    }

    /// **Scenario**: Serialized form uses role/content tags so stored checkpoints stay readable.
    #[test]
    fn message_serializes_with_role_tag() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    /// **Scenario**: with_system_prompt seeds exactly one system message; push appends in order.
    #[test]
    fn conversation_with_system_prompt_then_push() {
        let mut convo = Conversation::with_system_prompt("be helpful");
        assert_eq!(convo.len(), 1);
        convo.push(Message::user("hi"));
        convo.push(Message::assistant("hello"));
        assert_eq!(convo.len(), 3);
        assert_eq!(convo.messages[2].content(), "hello");
    }

    /// **Scenario**: Conversation round-trips through JSON unchanged.
    #[test]
    fn conversation_json_roundtrip() {
        let mut convo = Conversation::with_system_prompt("p");
        convo.push(Message::user("q"));
        let bytes = serde_json::to_vec(&convo).unwrap();
        let restored: Conversation = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(convo, restored);
    }
}
