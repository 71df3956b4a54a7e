//! Conversation - An ordered exchange of messages with an agent
//!
//! Conversation is an Entity once stored: its `ConversationId` is the sole
//! correlation key for lookups, updates and deletes by id. Before the first
//! `create` it may have no id at all, in which case the store assigns one.
//!
//! The id is always the *string form* of the store's identifier.
//! Adapters convert at the boundary; nothing here knows the native type.

/// Role of the message that carries an agent's system prompt.
///
/// Propagating an agent change rewrites the content of these messages.
pub const SYSTEM_ROLE: &str = "system";

/// Role used for messages written by a person
pub const USER_ROLE: &str = "user";

/// Role used for messages written by the model
pub const ASSISTANT_ROLE: &str = "assistant";

/// Unique identifier for a stored Conversation (string form)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single message. `role` is free-form; only `"system"` is special.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(SYSTEM_ROLE, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(USER_ROLE, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ASSISTANT_ROLE, content)
    }

    pub fn is_system(&self) -> bool {
        self.role == SYSTEM_ROLE
    }
}

/// Conversation - messages in order, held against an agent name
///
/// `agent_name` refers to `Agent::name` but the reference is not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    agent_name: String,
    messages: Vec<Message>,
    id: Option<ConversationId>,
}

impl Conversation {
    /// Create a conversation that has not been stored yet
    pub fn new(agent_name: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            agent_name: agent_name.into(),
            messages,
            id: None,
        }
    }

    /// Builder: set an explicit id
    pub fn with_id(mut self, id: impl Into<ConversationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: append a message
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    // ========== Getters ==========

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn id(&self) -> Option<&ConversationId> {
        self.id.as_ref()
    }

    /// Messages carrying the agent's system prompt
    pub fn system_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_system())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_creation() {
        let conversation = Conversation::new(
            "bot",
            vec![Message::system("You are helpful"), Message::user("hi")],
        );

        assert_eq!(conversation.agent_name(), "bot");
        assert_eq!(conversation.messages().len(), 2);
        assert!(conversation.id().is_none());
    }

    #[test]
    fn test_with_id() {
        let conversation =
            Conversation::new("bot", Vec::new()).with_id("65a1f0c2e4b0a1b2c3d4e5f6");

        assert_eq!(
            conversation.id().map(ConversationId::as_str),
            Some("65a1f0c2e4b0a1b2c3d4e5f6")
        );
    }

    #[test]
    fn test_system_messages() {
        let conversation = Conversation::new("bot", vec![Message::system("a")])
            .with_message(Message::user("hi"))
            .with_message(Message::assistant("hello"))
            .with_message(Message::system("b"));

        let contents: Vec<_> = conversation
            .system_messages()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["a", "b"]);
    }

    #[test]
    fn test_role_is_case_sensitive() {
        assert!(Message::new("system", "x").is_system());
        assert!(!Message::new("System", "x").is_system());
    }
}
