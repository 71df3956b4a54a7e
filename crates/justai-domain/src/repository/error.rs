//! Errors that can occur during repository operations
//!
//! Only two conditions are translated into domain terms: a duplicate key
//! on create (`AlreadyExists`) and a missing conversation on lookup by id
//! (`NotFound`). Store failures travel inside `Store` untouched.

use std::error::Error;

/// Errors that can occur during repository operations
#[derive(Debug)]
pub enum RepositoryError {
    /// A record with the same key is already stored
    AlreadyExists { entity: &'static str, key: String },
    /// Point lookup found nothing
    NotFound { entity: &'static str, id: String },
    /// String id that has no store-native form
    InvalidId { id: String },
    /// Operation keyed by id on an entity that has none
    MissingId { entity: &'static str },
    /// Stored document does not have the expected shape
    Malformed { message: String },
    /// Failed to persist (adapter-local failure, e.g. a poisoned lock)
    Persistence { message: String },
    /// Error raised by the store driver, passed through unchanged
    Store(Box<dyn Error + Send + Sync>),
}

impl RepositoryError {
    pub fn already_exists(entity: &'static str, key: impl Into<String>) -> Self {
        RepositoryError::AlreadyExists {
            entity,
            key: key.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn store(err: impl Error + Send + Sync + 'static) -> Self {
        RepositoryError::Store(Box::new(err))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, RepositoryError::AlreadyExists { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

impl core::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RepositoryError::AlreadyExists { entity, key } => {
                write!(f, "{} with {} already exists.", entity, key)
            }
            RepositoryError::NotFound { entity, id } => {
                write!(f, "{} with id {} does not exist.", entity, id)
            }
            RepositoryError::InvalidId { id } => {
                write!(f, "Invalid conversation id: {}", id)
            }
            RepositoryError::MissingId { entity } => {
                write!(f, "{} has no id", entity)
            }
            RepositoryError::Malformed { message } => {
                write!(f, "Malformed document: {}", message)
            }
            RepositoryError::Persistence { message } => {
                write!(f, "Persistence error: {}", message)
            }
            RepositoryError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl Error for RepositoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RepositoryError::Store(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RepositoryError::already_exists("Agent", "name bot");
        assert_eq!(err.to_string(), "Agent with name bot already exists.");

        let err = RepositoryError::not_found("Conversation", "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(
            err.to_string(),
            "Conversation with id 65a1f0c2e4b0a1b2c3d4e5f6 does not exist."
        );
    }

    #[test]
    fn test_store_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RepositoryError::store(io);

        let source = err.source().expect("store errors expose their source");
        let io = source
            .downcast_ref::<std::io::Error>()
            .expect("source is the original error");
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn test_predicates() {
        assert!(RepositoryError::already_exists("Agent", "name bot").is_already_exists());
        assert!(RepositoryError::not_found("Conversation", "x").is_not_found());
        assert!(!RepositoryError::MissingId { entity: "Conversation" }.is_not_found());
    }
}
