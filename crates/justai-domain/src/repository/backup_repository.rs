//! Backup Repository - Append-only archive of conversation snapshots
//!
//! Archive entries are keyed by agent name only. Backing up the same
//! conversation twice stores two entries.

use core::future::Future;

use crate::model::agent::Agent;
use crate::model::conversation::Conversation;
use crate::repository::error::RepositoryError;

/// One conversation or an ordered run of them
#[derive(Debug, Clone, Copy)]
pub enum BackupBatch<'a> {
    One(&'a Conversation),
    Many(&'a [Conversation]),
}

impl<'a> BackupBatch<'a> {
    /// Number of archive entries this batch produces
    pub fn len(&self) -> usize {
        match self {
            BackupBatch::One(_) => 1,
            BackupBatch::Many(conversations) => conversations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Conversation> {
        let slice: &'a [Conversation] = match *self {
            BackupBatch::One(conversation) => core::slice::from_ref(conversation),
            BackupBatch::Many(conversations) => conversations,
        };
        slice.iter()
    }
}

impl<'a> From<&'a Conversation> for BackupBatch<'a> {
    fn from(conversation: &'a Conversation) -> Self {
        BackupBatch::One(conversation)
    }
}

impl<'a> From<&'a [Conversation]> for BackupBatch<'a> {
    fn from(conversations: &'a [Conversation]) -> Self {
        BackupBatch::Many(conversations)
    }
}

impl<'a> From<&'a Vec<Conversation>> for BackupBatch<'a> {
    fn from(conversations: &'a Vec<Conversation>) -> Self {
        BackupBatch::Many(conversations.as_slice())
    }
}

/// Backup Repository Trait
///
/// This is a PORT in hexagonal architecture.
pub trait BackupRepository: Send + Sync {
    /// Raw archive document
    type Document: Clone + Send + Sync;

    /// Archive a snapshot of each conversation in the batch.
    /// `One` is a single insert, `Many` a bulk insert.
    fn backup_conversations(
        &self,
        batch: BackupBatch<'_>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Raw archive documents whose `agent_name` is `agent.name()`
    fn get_conversations_by_agent_object(
        &self,
        agent: &Agent,
    ) -> impl Future<Output = Result<Vec<Self::Document>, RepositoryError>> + Send;

    /// Remove archive entries whose `agent_name` is `agent.name()`, including
    /// entries added after they were last read
    fn delete_conversations_by_agent_object(
        &self,
        agent: &Agent,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove exactly these archive entries, matched on their stored id.
    /// Entries already gone are skipped.
    fn delete_documents(
        &self,
        documents: &[Self::Document],
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
