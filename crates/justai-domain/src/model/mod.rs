//! Domain Models - The vocabulary of JustAI
//!
//! An agent is a named system prompt. A conversation is an ordered
//! exchange of messages held against an agent's name.

pub mod agent;
pub mod conversation;
