//! Document shapes for the three collections
//!
//! ```text
//! agent         { name, system_prompt, dataset_generation_prompts: [..] }
//! conversation  { _id, agent_name, messages: [{ role, content }] }
//! backup        { _id: ObjectId, agent_name, messages: [{ role, content }] }
//! ```
//!
//! Conversation ids cross into the domain through `format_id` and back
//! through `parse_id` (explicit ids on insert) or `id_key` (lookups). No
//! other code converts between the two forms.
//!
//! `_id` is usually an ObjectId, but `recover` accepts documents with any
//! `_id`, so reads must not assume one.

use justai_domain::{Agent, Conversation, ConversationId, Message, RepositoryError, SYSTEM_ROLE};
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};

pub const ID_FIELD: &str = "_id";
pub const NAME_FIELD: &str = "name";
pub const SYSTEM_PROMPT_FIELD: &str = "system_prompt";
pub const GENERATION_PROMPTS_FIELD: &str = "dataset_generation_prompts";
pub const AGENT_NAME_FIELD: &str = "agent_name";
pub const MESSAGES_FIELD: &str = "messages";
pub const ROLE_FIELD: &str = "role";
pub const CONTENT_FIELD: &str = "content";

/// Matched by `delete_by_agent_object`. Not written by any adapter.
pub const AGENT_PROMPT_FIELD: &str = "agent_prompt";

pub(crate) const AGENT_ENTITY: &str = "Agent";
pub(crate) const CONVERSATION_ENTITY: &str = "Conversation";

// ========== Identifier conversion ==========

/// String id -> store-native id, for ids written by this crate.
///
/// Only the lowercase hex form `format_id` produces is accepted, so an
/// explicit id reads back exactly as it was given.
pub fn parse_id(id: &ConversationId) -> Result<ObjectId, RepositoryError> {
    match ObjectId::parse_str(id.as_str()) {
        Ok(oid) if oid.to_hex() == id.as_str() => Ok(oid),
        _ => Err(RepositoryError::InvalidId {
            id: id.as_str().to_string(),
        }),
    }
}

/// `_id` value to look a string id up by: the ObjectId when `id` is one,
/// the plain string otherwise.
pub fn id_key(id: &ConversationId) -> Bson {
    match parse_id(id) {
        Ok(oid) => Bson::ObjectId(oid),
        Err(_) => Bson::String(id.as_str().to_string()),
    }
}

/// Stored `_id` -> string id
pub fn format_id(id: &Bson) -> ConversationId {
    match id {
        Bson::ObjectId(oid) => ConversationId::new(oid.to_hex()),
        Bson::String(s) => ConversationId::new(s.as_str()),
        other => ConversationId::new(other.to_string()),
    }
}

// ========== Agent ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDocument {
    pub name: String,
    pub system_prompt: String,
    #[serde(default)]
    pub dataset_generation_prompts: Vec<String>,
}

impl From<&Agent> for AgentDocument {
    fn from(agent: &Agent) -> Self {
        Self {
            name: agent.name().to_string(),
            system_prompt: agent.system_prompt().to_string(),
            dataset_generation_prompts: agent.dataset_generation_prompts().to_vec(),
        }
    }
}

impl From<AgentDocument> for Agent {
    fn from(document: AgentDocument) -> Self {
        Agent::new(
            document.name,
            document.system_prompt,
            document.dataset_generation_prompts,
        )
    }
}

// ========== Conversation ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDocument {
    pub role: String,
    pub content: String,
}

impl From<&Message> for MessageDocument {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.clone(),
            content: message.content.clone(),
        }
    }
}

impl From<MessageDocument> for Message {
    fn from(document: MessageDocument) -> Self {
        Message::new(document.role, document.content)
    }
}

impl From<&MessageDocument> for Document {
    fn from(message: &MessageDocument) -> Self {
        doc! {
            ROLE_FIELD: message.role.as_str(),
            CONTENT_FIELD: message.content.as_str(),
        }
    }
}

/// Conversation document. Also the shape of a backup entry.
///
/// `id` is omitted on insert when absent so the store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    pub agent_name: String,
    #[serde(default)]
    pub messages: Vec<MessageDocument>,
}

impl ConversationDocument {
    /// Document for `conversation`, keeping its id when it has one
    pub fn from_conversation(conversation: &Conversation) -> Result<Self, RepositoryError> {
        let id = conversation.id().map(parse_id).transpose()?.map(Bson::ObjectId);
        Ok(Self {
            id,
            ..Self::snapshot(conversation)
        })
    }

    /// Archive snapshot: same fields, no id correlation
    pub fn snapshot(conversation: &Conversation) -> Self {
        Self {
            id: None,
            agent_name: conversation.agent_name().to_string(),
            messages: conversation.messages().iter().map(MessageDocument::from).collect(),
        }
    }

    pub fn into_conversation(self) -> Conversation {
        let messages = self.messages.into_iter().map(Message::from).collect();
        let conversation = Conversation::new(self.agent_name, messages);
        match self.id {
            Some(id) => conversation.with_id(format_id(&id)),
            None => conversation,
        }
    }

    /// Messages as an embedded array value
    pub fn message_array(&self) -> Vec<Document> {
        self.messages.iter().map(Document::from).collect()
    }
}

// ========== Raw document conversion ==========

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, RepositoryError> {
    bson::to_document(value).map_err(|e| RepositoryError::Malformed {
        message: e.to_string(),
    })
}

pub fn from_document<T: serde::de::DeserializeOwned>(
    document: Document,
) -> Result<T, RepositoryError> {
    bson::from_document(document).map_err(|e| RepositoryError::Malformed {
        message: e.to_string(),
    })
}

// ========== Filters ==========

pub fn agent_filter(name: &str) -> Document {
    doc! { NAME_FIELD: name }
}

pub fn agent_name_filter(agent_name: &str) -> Document {
    doc! { AGENT_NAME_FIELD: agent_name }
}

/// Name plus prompt equality on `agent_prompt`
pub fn agent_object_filter(agent: &Agent) -> Document {
    doc! {
        AGENT_NAME_FIELD: agent.name(),
        AGENT_PROMPT_FIELD: agent.system_prompt(),
    }
}

pub fn id_filter(id: &Bson) -> Document {
    doc! { ID_FIELD: id.clone() }
}

/// Matches any of the given `_id` values
pub fn ids_filter(ids: Vec<Bson>) -> Document {
    doc! { ID_FIELD: { "$in": ids } }
}

// ========== Updates ==========

/// `$set` of every agent field, name included
pub fn agent_update(updated: &Agent) -> Document {
    doc! {
        "$set": {
            NAME_FIELD: updated.name(),
            SYSTEM_PROMPT_FIELD: updated.system_prompt(),
            GENERATION_PROMPTS_FIELD: updated.dataset_generation_prompts().to_vec(),
        }
    }
}

/// `$set` of agent name and messages. The id is not touched.
pub fn conversation_update(updated: &Conversation) -> Document {
    let snapshot = ConversationDocument::snapshot(updated);
    doc! {
        "$set": {
            AGENT_NAME_FIELD: snapshot.agent_name.as_str(),
            MESSAGES_FIELD: snapshot.message_array(),
        }
    }
}

/// Update plus array filters moving conversations to `updated`.
///
/// Only elements of `messages` whose role is `system` get the new content.
pub fn agent_field_update(updated: &Agent) -> (Document, Vec<Document>) {
    let mut set = doc! { AGENT_NAME_FIELD: updated.name() };
    set.insert(
        format!("{}.$[elem].{}", MESSAGES_FIELD, CONTENT_FIELD),
        updated.system_prompt(),
    );

    let mut system_only = Document::new();
    system_only.insert(format!("elem.{}", ROLE_FIELD), SYSTEM_ROLE);

    (doc! { "$set": set }, vec![system_only])
}
