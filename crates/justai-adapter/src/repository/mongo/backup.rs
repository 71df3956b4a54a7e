//! `backup` collection

use futures::TryStreamExt;
use justai_domain::{Agent, BackupBatch, BackupRepository, RepositoryError};
use mongodb::bson::Document;
use mongodb::Collection;
use tracing::debug;

use super::{store_error, MongoStore};
use crate::repository::document::{agent_name_filter, ids_filter, ConversationDocument, ID_FIELD};

/// MongoDB Backup Repository
///
/// Entries are returned as raw documents, ready for
/// `ConversationRepository::recover`.
#[derive(Debug, Clone)]
pub struct MongoBackupRepository {
    collection: Collection<Document>,
}

impl MongoBackupRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(&store.collections().backup),
        }
    }
}

impl BackupRepository for MongoBackupRepository {
    type Document = Document;

    async fn backup_conversations(&self, batch: BackupBatch<'_>) -> Result<(), RepositoryError> {
        match batch {
            BackupBatch::One(conversation) => {
                debug!(agent = %conversation.agent_name(), "backup conversation");
                self.collection
                    .clone_with_type::<ConversationDocument>()
                    .insert_one(ConversationDocument::snapshot(conversation))
                    .await
                    .map_err(store_error)?;
            }
            BackupBatch::Many(conversations) => {
                if conversations.is_empty() {
                    return Ok(());
                }
                debug!(count = conversations.len(), "backup conversations");
                let documents: Vec<ConversationDocument> = conversations
                    .iter()
                    .map(ConversationDocument::snapshot)
                    .collect();
                self.collection
                    .clone_with_type::<ConversationDocument>()
                    .insert_many(documents)
                    .await
                    .map_err(store_error)?;
            }
        }
        Ok(())
    }

    async fn get_conversations_by_agent_object(
        &self,
        agent: &Agent,
    ) -> Result<Vec<Document>, RepositoryError> {
        let cursor = self
            .collection
            .find(agent_name_filter(agent.name()))
            .await
            .map_err(store_error)?;
        cursor.try_collect().await.map_err(store_error)
    }

    async fn delete_conversations_by_agent_object(
        &self,
        agent: &Agent,
    ) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .delete_many(agent_name_filter(agent.name()))
            .await
            .map_err(store_error)?;
        debug!(agent = %agent.name(), deleted = result.deleted_count, "delete backups");
        Ok(())
    }

    async fn delete_documents(&self, documents: &[Document]) -> Result<(), RepositoryError> {
        let ids: Vec<_> = documents.iter().filter_map(|d| d.get(ID_FIELD).cloned()).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let result = self
            .collection
            .delete_many(ids_filter(ids))
            .await
            .map_err(store_error)?;
        debug!(deleted = result.deleted_count, "delete backup entries");
        Ok(())
    }
}
