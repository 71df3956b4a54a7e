//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! These traits define HOW the domain wants to persist data,
//! but NOT how it's actually done. That's the adapter's job.
//!
//! ```text
//! Domain Layer              │  Adapter Layer
//! ──────────────────────────┼────────────────────────────
//! trait AgentRepository     │  MongoAgentRepository
//! trait ConversationRepo    │  MongoConversationRepository
//! trait BackupRepository    │  InMemory*Repository
//! ```
//!
//! All methods are async. There is no locking or cross-call atomicity at
//! this layer: each method maps to a single store operation.

pub mod agent_repository;
pub mod backup_repository;
pub mod conversation_repository;
pub mod error;
