//! CLI Commands

pub mod agent;
pub mod conversation;

pub use agent::AgentCommand;
pub use conversation::ConversationCommand;
