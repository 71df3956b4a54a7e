//! In-Memory Repository Implementations
//!
//! In-process implementations of the repository traits.
//! Useful for testing and development.
//!
//! Records are kept as the same documents the MongoDB adapter writes, in
//! insertion order. Unique agent names, unique conversation `_id`s, the
//! element-scoped `system` message rewrite of `update_agent_field` and the
//! ordered, stop-at-first-clash `recover` behave as they do in MongoDB.
//! Each call runs under one lock, so unlike the store nothing interleaves
//! inside a single call.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use justai_domain::{
    Agent, AgentRepository, BackupBatch, BackupRepository, Conversation, ConversationId,
    ConversationRepository, RepositoryError, SYSTEM_ROLE,
};
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::repository::document::{
    format_id, from_document, id_key, to_document, AgentDocument, ConversationDocument,
    AGENT_ENTITY, AGENT_NAME_FIELD, AGENT_PROMPT_FIELD, CONTENT_FIELD, CONVERSATION_ENTITY,
    ID_FIELD, MESSAGES_FIELD, ROLE_FIELD,
};

type Records<T> = Arc<RwLock<Vec<T>>>;

fn read<T>(records: &RwLock<Vec<T>>) -> Result<RwLockReadGuard<'_, Vec<T>>, RepositoryError> {
    records.read().map_err(|_| RepositoryError::Persistence {
        message: "Failed to acquire read lock".to_string(),
    })
}

fn write<T>(records: &RwLock<Vec<T>>) -> Result<RwLockWriteGuard<'_, Vec<T>>, RepositoryError> {
    records.write().map_err(|_| RepositoryError::Persistence {
        message: "Failed to acquire write lock".to_string(),
    })
}

fn has_agent_name(document: &Document, agent_name: &str) -> bool {
    document.get_str(AGENT_NAME_FIELD).ok() == Some(agent_name)
}

fn has_id(document: &Document, id: &Bson) -> bool {
    document.get(ID_FIELD) == Some(id)
}

/// Stored documents always carry an `_id`; assign one when absent
fn with_assigned_id(mut document: Document) -> Document {
    if !document.contains_key(ID_FIELD) {
        document.insert(ID_FIELD, ObjectId::new());
    }
    document
}

/// In-memory stand-in for `MongoStore`: one list per collection
///
/// Repositories built from the same store (or its clones) share data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    agents: Records<AgentDocument>,
    conversations: Records<Document>,
    backups: Records<Document>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of archive entries, across all agents
    pub fn backup_count(&self) -> Result<usize, RepositoryError> {
        Ok(read(&self.backups)?.len())
    }

    /// Number of stored conversations
    pub fn conversation_count(&self) -> Result<usize, RepositoryError> {
        Ok(read(&self.conversations)?.len())
    }
}

// ========== Agent ==========

/// In-memory Agent Repository
#[derive(Debug, Clone)]
pub struct InMemoryAgentRepository {
    agents: Records<AgentDocument>,
}

impl InMemoryAgentRepository {
    pub fn new(store: &InMemoryStore) -> Self {
        Self {
            agents: Arc::clone(&store.agents),
        }
    }
}

impl AgentRepository for InMemoryAgentRepository {
    async fn get_by_name(&self, name: &str) -> Result<Option<Agent>, RepositoryError> {
        let agents = read(&self.agents)?;
        Ok(agents
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .map(Agent::from))
    }

    async fn create(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let mut agents = write(&self.agents)?;
        if agents.iter().any(|a| a.name == agent.name()) {
            return Err(RepositoryError::already_exists(
                AGENT_ENTITY,
                format!("name {}", agent.name()),
            ));
        }
        agents.push(AgentDocument::from(agent));
        Ok(())
    }

    async fn update(&self, current: &Agent, updated: &Agent) -> Result<(), RepositoryError> {
        let mut agents = write(&self.agents)?;
        let Some(index) = agents.iter().position(|a| a.name == current.name()) else {
            return Ok(());
        };

        let collides = agents
            .iter()
            .enumerate()
            .any(|(i, a)| i != index && a.name == updated.name());
        if collides {
            return Err(RepositoryError::already_exists(
                AGENT_ENTITY,
                format!("name {}", updated.name()),
            ));
        }

        agents[index] = AgentDocument::from(updated);
        Ok(())
    }

    async fn delete(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let mut agents = write(&self.agents)?;
        if let Some(index) = agents.iter().position(|a| a.name == agent.name()) {
            agents.remove(index);
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Agent>, RepositoryError> {
        let agents = read(&self.agents)?;
        Ok(agents.iter().cloned().map(Agent::from).collect())
    }
}

// ========== Conversation ==========

/// In-memory Conversation Repository
#[derive(Debug, Clone)]
pub struct InMemoryConversationRepository {
    conversations: Records<Document>,
}

impl InMemoryConversationRepository {
    pub fn new(store: &InMemoryStore) -> Self {
        Self {
            conversations: Arc::clone(&store.conversations),
        }
    }

    fn collect(
        &self,
        filter: impl Fn(&Document) -> bool,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let conversations = read(&self.conversations)?;
        conversations
            .iter()
            .filter(|d| filter(*d))
            .map(|d| {
                from_document::<ConversationDocument>(d.clone())
                    .map(ConversationDocument::into_conversation)
            })
            .collect()
    }
}

impl ConversationRepository for InMemoryConversationRepository {
    type Document = Document;

    async fn create(&self, conversation: &Conversation) -> Result<ConversationId, RepositoryError> {
        let mut document = ConversationDocument::from_conversation(conversation)?;
        let id = document
            .id
            .get_or_insert_with(|| Bson::ObjectId(ObjectId::new()))
            .clone();

        let mut conversations = write(&self.conversations)?;
        if conversations.iter().any(|d| has_id(d, &id)) {
            return Err(RepositoryError::already_exists(
                CONVERSATION_ENTITY,
                format!("id {}", format_id(&id)),
            ));
        }
        conversations.push(to_document(&document)?);
        Ok(format_id(&id))
    }

    async fn get_by_agent_name(
        &self,
        agent_name: &str,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        self.collect(|d| has_agent_name(d, agent_name))
    }

    async fn get_by_id(&self, id: &ConversationId) -> Result<Conversation, RepositoryError> {
        let key = id_key(id);
        self.collect(|d| has_id(d, &key))?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::not_found(CONVERSATION_ENTITY, id.as_str()))
    }

    async fn update(
        &self,
        current: &Conversation,
        updated: &Conversation,
    ) -> Result<(), RepositoryError> {
        let id = current.id().ok_or(RepositoryError::MissingId {
            entity: CONVERSATION_ENTITY,
        })?;
        let key = id_key(id);
        let snapshot = ConversationDocument::snapshot(updated);

        let mut conversations = write(&self.conversations)?;
        if let Some(document) = conversations.iter_mut().find(|d| has_id(d, &key)) {
            document.insert(AGENT_NAME_FIELD, snapshot.agent_name.as_str());
            document.insert(MESSAGES_FIELD, snapshot.message_array());
        }
        Ok(())
    }

    async fn update_agent_field(
        &self,
        current: &Agent,
        updated: &Agent,
    ) -> Result<(), RepositoryError> {
        let mut conversations = write(&self.conversations)?;
        for document in conversations
            .iter_mut()
            .filter(|d| has_agent_name(d, current.name()))
        {
            document.insert(AGENT_NAME_FIELD, updated.name());

            let Ok(messages) = document.get_array_mut(MESSAGES_FIELD) else {
                continue;
            };
            for message in messages.iter_mut() {
                if let Bson::Document(message) = message {
                    if message.get_str(ROLE_FIELD).ok() == Some(SYSTEM_ROLE) {
                        message.insert(CONTENT_FIELD, updated.system_prompt());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete_by_agent_name(&self, agent_name: &str) -> Result<(), RepositoryError> {
        let mut conversations = write(&self.conversations)?;
        conversations.retain(|d| !has_agent_name(d, agent_name));
        Ok(())
    }

    async fn delete_by_agent_object(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let mut conversations = write(&self.conversations)?;
        conversations.retain(|d| {
            !(has_agent_name(d, agent.name())
                && d.get_str(AGENT_PROMPT_FIELD).ok() == Some(agent.system_prompt()))
        });
        Ok(())
    }

    async fn delete_by_id(&self, id: &ConversationId) -> Result<(), RepositoryError> {
        let key = id_key(id);
        let mut conversations = write(&self.conversations)?;
        if let Some(index) = conversations.iter().position(|d| has_id(d, &key)) {
            conversations.remove(index);
        }
        Ok(())
    }

    async fn recover(&self, documents: Vec<Document>) -> Result<(), RepositoryError> {
        let mut conversations = write(&self.conversations)?;
        for document in documents.into_iter().map(with_assigned_id) {
            if let Some(id) = document.get(ID_FIELD) {
                if conversations.iter().any(|d| has_id(d, id)) {
                    return Err(RepositoryError::already_exists(
                        CONVERSATION_ENTITY,
                        format!("id {}", format_id(id)),
                    ));
                }
            }
            conversations.push(document);
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Conversation>, RepositoryError> {
        self.collect(|_| true)
    }
}

// ========== Backup ==========

/// In-memory Backup Repository
#[derive(Debug, Clone)]
pub struct InMemoryBackupRepository {
    backups: Records<Document>,
}

impl InMemoryBackupRepository {
    pub fn new(store: &InMemoryStore) -> Self {
        Self {
            backups: Arc::clone(&store.backups),
        }
    }
}

impl BackupRepository for InMemoryBackupRepository {
    type Document = Document;

    async fn backup_conversations(&self, batch: BackupBatch<'_>) -> Result<(), RepositoryError> {
        let documents = batch
            .iter()
            .map(|c| to_document(&ConversationDocument::snapshot(c)).map(with_assigned_id))
            .collect::<Result<Vec<_>, _>>()?;

        write(&self.backups)?.extend(documents);
        Ok(())
    }

    async fn get_conversations_by_agent_object(
        &self,
        agent: &Agent,
    ) -> Result<Vec<Document>, RepositoryError> {
        let backups = read(&self.backups)?;
        Ok(backups
            .iter()
            .filter(|d| has_agent_name(d, agent.name()))
            .cloned()
            .collect())
    }

    async fn delete_conversations_by_agent_object(
        &self,
        agent: &Agent,
    ) -> Result<(), RepositoryError> {
        write(&self.backups)?.retain(|d| !has_agent_name(d, agent.name()));
        Ok(())
    }

    async fn delete_documents(&self, documents: &[Document]) -> Result<(), RepositoryError> {
        let ids: Vec<&Bson> = documents.iter().filter_map(|d| d.get(ID_FIELD)).collect();
        write(&self.backups)?.retain(|d| !d.get(ID_FIELD).is_some_and(|id| ids.contains(&id)));
        Ok(())
    }
}
