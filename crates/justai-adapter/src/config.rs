//! Configuration for the document store

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AdapterError, Result};

/// Environment variable holding the connection string
pub const URI_ENV: &str = "JUSTAI_MONGO_URI";

/// Environment variable overriding the database name
pub const DATABASE_ENV: &str = "JUSTAI_DATABASE";

pub const DEFAULT_DATABASE: &str = "AgentConvoDB";

/// Names of the three collections in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNames {
    #[serde(default = "default_agent_collection")]
    pub agent: String,

    #[serde(default = "default_conversation_collection")]
    pub conversation: String,

    #[serde(default = "default_backup_collection")]
    pub backup: String,
}

fn default_agent_collection() -> String {
    "agent".to_string()
}

fn default_conversation_collection() -> String {
    "conversation".to_string()
}

fn default_backup_collection() -> String {
    "backup".to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            agent: default_agent_collection(),
            conversation: default_conversation_collection(),
            backup: default_backup_collection(),
        }
    }
}

/// Store configuration format (justai.json)
///
/// ```json
/// {
///   "uri": "mongodb://localhost:27017",
///   "database": "AgentConvoDB",
///   "collections": { "backup": "backup_v2" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// MongoDB connection string
    pub uri: String,

    /// Logical database holding all three collections
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default)]
    pub collections: CollectionNames,
}

impl StoreConfig {
    /// Default database and collection names for `uri`
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: default_database(),
            collections: CollectionNames::default(),
        }
    }

    /// Builder: use another database
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `JUSTAI_MONGO_URI` / `JUSTAI_DATABASE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let uri = lookup(URI_ENV)
            .ok_or_else(|| AdapterError::Config(format!("{} is not set", URI_ENV)))?;

        let mut config = Self::new(uri);
        if let Some(database) = lookup(DATABASE_ENV) {
            config.database = database;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(AdapterError::Config("uri must not be empty".to_string()));
        }
        if self.database.trim().is_empty() {
            return Err(AdapterError::Config("database must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_config_parse_defaults() {
        let json = r#"{ "uri": "mongodb://localhost:27017" }"#;

        let config: StoreConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, StoreConfig::new("mongodb://localhost:27017"));
        assert_eq!(config.database, "AgentConvoDB");
        assert_eq!(config.collections.agent, "agent");
        assert_eq!(config.collections.conversation, "conversation");
        assert_eq!(config.collections.backup, "backup");
    }

    #[test]
    fn test_config_partial_collections() {
        let json = r#"{
            "uri": "mongodb://db:27017",
            "database": "Staging",
            "collections": { "backup": "backup_v2" }
        }"#;

        let config: StoreConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.database, "Staging");
        assert_eq!(config.collections.agent, "agent");
        assert_eq!(config.collections.backup, "backup_v2");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "uri": "mongodb://localhost:27017", "database": "Test" }}"#).unwrap();

        let config = StoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database, "Test");
    }

    #[test]
    fn test_from_file_rejects_empty_uri() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "uri": "  " }}"#).unwrap();

        let err = StoreConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AdapterError::Config(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = StoreConfig::from_file(Path::new("/nonexistent/justai.json")).unwrap_err();
        assert!(matches!(err, AdapterError::Io(_)));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [
            (URI_ENV, "mongodb://localhost:27017"),
            (DATABASE_ENV, "Other"),
        ]
        .into_iter()
        .collect();

        let config = StoreConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "Other");

        let err = StoreConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, AdapterError::Config(_)));
    }
}
