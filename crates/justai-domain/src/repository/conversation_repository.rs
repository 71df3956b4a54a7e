//! Conversation Repository - Abstract persistence for Conversations
//!
//! Every read path hands back conversations whose id is the string form of
//! the stored identifier, whatever its type, and every id-keyed lookup
//! converts that string back. A conversation read from the store can
//! therefore be passed straight to `get_by_id`, `update` or `delete_by_id`.

use core::future::Future;

use crate::model::agent::Agent;
use crate::model::conversation::{Conversation, ConversationId};
use crate::repository::error::RepositoryError;

/// Conversation Repository Trait
///
/// This is a PORT in hexagonal architecture.
pub trait ConversationRepository: Send + Sync {
    /// Raw stored document, as accepted by `recover`
    type Document: Clone + Send + Sync;

    /// Insert a conversation and return the id it is stored under.
    ///
    /// With an explicit id the record is stored under that id; otherwise the
    /// store assigns one.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if a record already uses the explicit id
    /// - `InvalidId` if the explicit id is not in the form this store
    ///   hands out, so it would not read back unchanged
    fn create(
        &self,
        conversation: &Conversation,
    ) -> impl Future<Output = Result<ConversationId, RepositoryError>> + Send;

    /// All conversations held against `agent_name`; empty when there are none.
    fn get_by_agent_name(
        &self,
        agent_name: &str,
    ) -> impl Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Point lookup by id.
    ///
    /// Unlike `AgentRepository::get_by_name`, absence is an error here.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record has this id
    fn get_by_id(
        &self,
        id: &ConversationId,
    ) -> impl Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Overwrite `agent_name` and `messages` of the record matched by
    /// `current.id()`. The id itself is never changed.
    ///
    /// # Errors
    ///
    /// - `MissingId` if `current` has no id
    fn update(
        &self,
        current: &Conversation,
        updated: &Conversation,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// For every conversation of `current.name()`: move it to `updated.name()`
    /// and replace the content of each `system` message with
    /// `updated.system_prompt()`. Messages with other roles are left alone.
    fn update_agent_field(
        &self,
        current: &Agent,
        updated: &Agent,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove every conversation of `agent_name`
    fn delete_by_agent_name(
        &self,
        agent_name: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove conversations matching the agent's name AND an `agent_prompt`
    /// field equal to its system prompt.
    ///
    /// Conversation documents written by `create` have no `agent_prompt`
    /// field, so this only matches documents that carry one (e.g. restored
    /// from an external archive). Use `delete_by_agent_name` to remove every
    /// conversation of an agent.
    fn delete_by_agent_object(
        &self,
        agent: &Agent,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove the conversation with this id. Removing a missing id is a no-op.
    fn delete_by_id(
        &self,
        id: &ConversationId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Bulk-insert raw documents in order, bypassing `create` validation.
    /// Used to restore archived conversations.
    ///
    /// Insertion stops at the first document whose id is already taken;
    /// documents before it stay inserted.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` naming the first clashing id
    fn recover(
        &self,
        documents: Vec<Self::Document>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Every stored conversation
    fn get_all(&self) -> impl Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;
}
