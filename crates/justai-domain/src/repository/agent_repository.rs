//! Agent Repository - Abstract persistence for Agents
//!
//! Agents are keyed by name. Lookups by name return `None` when nothing
//! matches; only `create` (and a rename in `update`) can collide.

use core::future::Future;

use crate::model::agent::Agent;
use crate::repository::error::RepositoryError;

/// Agent Repository Trait
///
/// This is a PORT in hexagonal architecture.
pub trait AgentRepository: Send + Sync {
    /// Find an agent by its unique name. Absence is `Ok(None)`, not an error.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Agent>, RepositoryError>> + Send;

    /// Insert a new agent.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if an agent with the same name is stored; the
    ///   stored record is left untouched
    fn create(&self, agent: &Agent) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Overwrite every field of the agent named `current.name()` with the
    /// values of `updated`, including the name itself.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if `updated` renames onto a name already in use
    fn update(
        &self,
        current: &Agent,
        updated: &Agent,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove the agent named `agent.name()`. Removing a missing agent is a no-op.
    fn delete(&self, agent: &Agent) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// List every stored agent in store order
    fn get_all(&self) -> impl Future<Output = Result<Vec<Agent>, RepositoryError>> + Send;
}
