//! `conversation` collection

use futures::TryStreamExt;
use justai_domain::{Agent, Conversation, ConversationId, ConversationRepository, RepositoryError};
use mongodb::bson::{doc, Bson, Document};
use mongodb::Collection;
use tracing::{debug, warn};

use super::{duplicate_key_index, is_duplicate_key, store_error, MongoStore};
use crate::repository::document::{
    agent_field_update, agent_name_filter, agent_object_filter, conversation_update, format_id,
    id_filter, id_key, ConversationDocument, CONVERSATION_ENTITY, ID_FIELD,
};

/// MongoDB Conversation Repository
#[derive(Debug, Clone)]
pub struct MongoConversationRepository {
    collection: Collection<ConversationDocument>,
}

impl MongoConversationRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(&store.collections().conversation),
        }
    }

    async fn find(&self, filter: Document) -> Result<Vec<Conversation>, RepositoryError> {
        let cursor = self.collection.find(filter).await.map_err(store_error)?;
        let documents: Vec<ConversationDocument> =
            cursor.try_collect().await.map_err(store_error)?;
        Ok(documents
            .into_iter()
            .map(ConversationDocument::into_conversation)
            .collect())
    }
}

impl ConversationRepository for MongoConversationRepository {
    type Document = Document;

    async fn create(&self, conversation: &Conversation) -> Result<ConversationId, RepositoryError> {
        // An explicit id goes in as `_id`, so a clash surfaces as a
        // duplicate-key error from this one insert.
        let document = ConversationDocument::from_conversation(conversation)?;
        debug!(
            agent = %document.agent_name,
            explicit_id = document.id.is_some(),
            "insert conversation"
        );

        match self.collection.insert_one(&document).await {
            Ok(result) => Ok(format_id(&result.inserted_id)),
            Err(err) if is_duplicate_key(&err) => {
                let id = conversation.id().map(ConversationId::as_str).unwrap_or_default();
                warn!(conversation = %id, "Conversation id already taken");
                Err(RepositoryError::already_exists(
                    CONVERSATION_ENTITY,
                    format!("id {}", id),
                ))
            }
            Err(err) => Err(store_error(err)),
        }
    }

    async fn get_by_agent_name(
        &self,
        agent_name: &str,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        debug!(agent = %agent_name, "find conversations");
        self.find(agent_name_filter(agent_name)).await
    }

    async fn get_by_id(&self, id: &ConversationId) -> Result<Conversation, RepositoryError> {
        debug!(conversation = %id, "find conversation");

        self.collection
            .find_one(id_filter(&id_key(id)))
            .await
            .map_err(store_error)?
            .map(ConversationDocument::into_conversation)
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
        debug!(conversation = %id, "update conversation");

        self.collection
            .update_one(id_filter(&id_key(id)), conversation_update(updated))
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_agent_field(
        &self,
        current: &Agent,
        updated: &Agent,
    ) -> Result<(), RepositoryError> {
        let (update, array_filters) = agent_field_update(updated);

        let result = self
            .collection
            .update_many(agent_name_filter(current.name()), update)
            .array_filters(array_filters)
            .await
            .map_err(store_error)?;

        debug!(
            agent = %current.name(),
            renamed_to = %updated.name(),
            modified = result.modified_count,
            "propagated agent fields to conversations"
        );
        Ok(())
    }

    async fn delete_by_agent_name(&self, agent_name: &str) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .delete_many(agent_name_filter(agent_name))
            .await
            .map_err(store_error)?;
        debug!(agent = %agent_name, deleted = result.deleted_count, "delete conversations");
        Ok(())
    }

    async fn delete_by_agent_object(&self, agent: &Agent) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .delete_many(agent_object_filter(agent))
            .await
            .map_err(store_error)?;
        debug!(
            agent = %agent.name(),
            deleted = result.deleted_count,
            "delete conversations by agent prompt"
        );
        Ok(())
    }

    async fn delete_by_id(&self, id: &ConversationId) -> Result<(), RepositoryError> {
        debug!(conversation = %id, "delete conversation");

        self.collection
            .delete_one(id_filter(&id_key(id)))
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn recover(&self, documents: Vec<Document>) -> Result<(), RepositoryError> {
        if documents.is_empty() {
            return Ok(());
        }
        debug!(count = documents.len(), "recover conversations");
        let ids: Vec<Option<Bson>> = documents.iter().map(|d| d.get(ID_FIELD).cloned()).collect();

        // Ordered insert: documents before a clash stay inserted
        match self
            .collection
            .clone_with_type::<Document>()
            .insert_many(documents)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => match duplicate_key_index(&err) {
                Some(index) => {
                    let key = ids
                        .get(index)
                        .cloned()
                        .flatten()
                        .map(|id| format_id(&id).to_string())
                        .unwrap_or_default();
                    warn!(conversation = %key, "Recovered conversation id already taken");
                    Err(RepositoryError::already_exists(
                        CONVERSATION_ENTITY,
                        format!("id {}", key),
                    ))
                }
                None => Err(store_error(err)),
            },
        }
    }

    async fn get_all(&self) -> Result<Vec<Conversation>, RepositoryError> {
        self.find(doc! {}).await
    }
}
