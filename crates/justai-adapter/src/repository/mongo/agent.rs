//! `agent` collection

use futures::TryStreamExt;
use justai_domain::{Agent, AgentRepository, RepositoryError};
use mongodb::bson::doc;
use mongodb::Collection;
use tracing::{debug, warn};

use super::{is_duplicate_key, store_error, MongoStore};
use crate::repository::document::{agent_filter, agent_update, AgentDocument, AGENT_ENTITY};

/// MongoDB Agent Repository
#[derive(Debug, Clone)]
pub struct MongoAgentRepository {
    collection: Collection<AgentDocument>,
}

impl MongoAgentRepository {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(&store.collections().agent),
        }
    }
}

fn duplicate_name(name: &str) -> RepositoryError {
    warn!(agent = %name, "Agent name already taken");
    RepositoryError::already_exists(AGENT_ENTITY, format!("name {}", name))
}

impl AgentRepository for MongoAgentRepository {
    async fn get_by_name(&self, name: &str) -> Result<Option<Agent>, RepositoryError> {
        debug!(agent = %name, "find agent");
        let document = self
            .collection
            .find_one(agent_filter(name))
            .await
            .map_err(store_error)?;
        Ok(document.map(Agent::from))
    }

    async fn create(&self, agent: &Agent) -> Result<(), RepositoryError> {
        debug!(agent = %agent.name(), "insert agent");
        match self.collection.insert_one(AgentDocument::from(agent)).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(duplicate_name(agent.name())),
            Err(err) => Err(store_error(err)),
        }
    }

    async fn update(&self, current: &Agent, updated: &Agent) -> Result<(), RepositoryError> {
        debug!(agent = %current.name(), renamed_to = %updated.name(), "update agent");
        match self
            .collection
            .update_one(agent_filter(current.name()), agent_update(updated))
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(duplicate_name(updated.name())),
            Err(err) => Err(store_error(err)),
        }
    }

    async fn delete(&self, agent: &Agent) -> Result<(), RepositoryError> {
        debug!(agent = %agent.name(), "delete agent");
        self.collection
            .delete_one(agent_filter(agent.name()))
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Agent>, RepositoryError> {
        let cursor = self.collection.find(doc! {}).await.map_err(store_error)?;
        let documents: Vec<AgentDocument> = cursor.try_collect().await.map_err(store_error)?;
        Ok(documents.into_iter().map(Agent::from).collect())
    }
}
