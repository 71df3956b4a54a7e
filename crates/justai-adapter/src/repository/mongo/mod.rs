//! MongoDB Repository Implementations
//!
//! One `MongoStore` is opened at process start and handed to each
//! repository, which keeps its own collection handle. The driver's client
//! pools connections internally; nothing here locks or retries.

mod agent;
mod backup;
mod conversation;

pub use agent::MongoAgentRepository;
pub use backup::MongoBackupRepository;
pub use conversation::MongoConversationRepository;

use justai_domain::RepositoryError;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info};

use crate::config::{CollectionNames, StoreConfig};
use crate::repository::document::NAME_FIELD;
use crate::error::Result;

/// Server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

/// Shared handle to the document store
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
    collections: CollectionNames,
}

impl MongoStore {
    /// Connect and make sure the agent name index exists
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let store = Self::with_client(client, config);
        store.ensure_indexes().await?;

        info!(database = %config.database, "Connected to document store");
        Ok(store)
    }

    /// Wrap an existing client without touching the server
    pub fn with_client(client: Client, config: &StoreConfig) -> Self {
        let database = client.database(&config.database);
        Self {
            client,
            database,
            collections: config.collections.clone(),
        }
    }

    /// Unique index on `agent.name`; agent creation relies on it
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { NAME_FIELD: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection::<mongodb::bson::Document>(&self.collections.agent)
            .create_index(index)
            .await?;

        debug!(collection = %self.collections.agent, "Ensured unique index on name");
        Ok(())
    }

    /// Round-trip to the server
    pub async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn collections(&self) -> &CollectionNames {
        &self.collections
    }

    pub(crate) fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY
    )
}

/// Position in the batch of the first document an `insert_many` rejected
/// as a duplicate key
pub(crate) fn duplicate_key_index(err: &mongodb::error::Error) -> Option<usize> {
    match err.kind.as_ref() {
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()?
            .iter()
            .find(|e| e.code == DUPLICATE_KEY)
            .map(|e| e.index),
        _ => None,
    }
}

pub(crate) fn store_error(err: mongodb::error::Error) -> RepositoryError {
    RepositoryError::store(err)
}
