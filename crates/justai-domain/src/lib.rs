//! # JustAI Domain Layer
//!
//! Agents, their conversations, and the ports used to persist them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Agent, Conversation, Message, ConversationId  ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule
//!
//! **This crate has ZERO external dependencies.**
//!
//! Conversation identifiers cross this boundary as strings only. The
//! store-native identifier type never appears in a domain object.

pub mod model;
pub mod repository;

// Re-export commonly used types
pub use model::{
    agent::Agent,
    conversation::{Conversation, ConversationId, Message, SYSTEM_ROLE},
};

pub use repository::{
    agent_repository::AgentRepository,
    backup_repository::{BackupBatch, BackupRepository},
    conversation_repository::ConversationRepository,
    error::RepositoryError,
};
