//! Error types for store setup
//!
//! Repository operations report `justai_domain::RepositoryError`; these
//! errors cover loading configuration and opening the connection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
