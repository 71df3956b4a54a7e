//! # JustAI Adapter Layer
//!
//! Outbound adapters (Hexagonal Architecture) for the repository ports
//! defined in `justai-domain`.
//!
//! ## Structure
//!
//! - `config` - Store connection settings
//! - `error` - Setup errors (configuration, connection)
//! - `repository/` - Persistence implementations
//!   - `document` - Document shapes and id conversion shared by all adapters
//!   - `mongo` - MongoDB repositories
//!   - `in_memory` - In-process repositories over the same document shapes

pub mod config;
pub mod error;
pub mod repository;

pub use config::{CollectionNames, StoreConfig};
pub use error::{AdapterError, Result};
pub use repository::in_memory::{
    InMemoryAgentRepository, InMemoryBackupRepository, InMemoryConversationRepository,
    InMemoryStore,
};
pub use repository::mongo::{
    MongoAgentRepository, MongoBackupRepository, MongoConversationRepository, MongoStore,
};

/// Raw document type exchanged by `recover` and the backup archive
pub use mongodb::bson::Document;
