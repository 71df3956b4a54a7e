//! # JustAI Use Case Layer
//!
//! Application-specific business rules.
//! This layer orchestrates the flow of data between the three repositories:
//! agent changes reach stored conversations, and retiring an agent moves its
//! conversations to the backup archive where they can be restored from.

pub use justai_domain;

use justai_domain::{
    Agent, AgentRepository, BackupBatch, BackupRepository, Conversation, ConversationId,
    ConversationRepository, Message, RepositoryError,
};

/// Agent lifecycle workflows
///
/// Each step is a separate store call. A failure part-way through leaves
/// the earlier steps applied; nothing is rolled back.
#[derive(Debug, Clone)]
pub struct AgentLifecycle<A, C, B> {
    agents: A,
    conversations: C,
    backups: B,
}

impl<A, C, B> AgentLifecycle<A, C, B>
where
    A: AgentRepository,
    C: ConversationRepository<Document = B::Document>,
    B: BackupRepository,
{
    pub fn new(agents: A, conversations: C, backups: B) -> Self {
        Self {
            agents,
            conversations,
            backups,
        }
    }

    pub fn agents(&self) -> &A {
        &self.agents
    }

    pub fn conversations(&self) -> &C {
        &self.conversations
    }

    pub fn backups(&self) -> &B {
        &self.backups
    }

    /// Store a new agent
    pub async fn register(&self, agent: &Agent) -> Result<(), RepositoryError> {
        self.agents.create(agent).await
    }

    /// Update the agent, then carry its new name and system prompt into
    /// every conversation held against the old name.
    ///
    /// Conversations are left alone when the agent update is rejected.
    pub async fn revise(&self, current: &Agent, updated: &Agent) -> Result<(), RepositoryError> {
        self.agents.update(current, updated).await?;
        self.conversations.update_agent_field(current, updated).await
    }

    /// Archive the agent's conversations, remove them, then remove the agent.
    ///
    /// Only the conversations that were archived are removed. One created
    /// while this runs stays in the conversation collection.
    ///
    /// Returns the number of conversations archived.
    pub async fn retire(&self, agent: &Agent) -> Result<usize, RepositoryError> {
        let conversations = self.conversations.get_by_agent_name(agent.name()).await?;
        if !conversations.is_empty() {
            self.backups
                .backup_conversations(BackupBatch::Many(&conversations))
                .await?;
        }
        for id in conversations.iter().filter_map(Conversation::id) {
            self.conversations.delete_by_id(id).await?;
        }
        self.agents.delete(agent).await?;
        Ok(conversations.len())
    }

    /// Move the agent's archived conversations back into the conversation
    /// collection and clear them from the archive.
    ///
    /// Only the entries that were recovered leave the archive. If `recover`
    /// fails the archive is left untouched.
    ///
    /// Returns the number of conversations restored.
    pub async fn restore(&self, agent: &Agent) -> Result<usize, RepositoryError> {
        let documents = self.backups.get_conversations_by_agent_object(agent).await?;
        let restored = documents.len();
        if restored == 0 {
            return Ok(0);
        }

        self.conversations.recover(documents.clone()).await?;
        self.backups.delete_documents(&documents).await?;
        Ok(restored)
    }

    /// Open a conversation with the agent's system prompt followed by the
    /// first user message.
    pub async fn start_conversation(
        &self,
        agent: &Agent,
        first_message: &str,
    ) -> Result<ConversationId, RepositoryError> {
        let conversation = Conversation::new(
            agent.name(),
            vec![
                Message::system(agent.system_prompt()),
                Message::user(first_message),
            ],
        );
        self.conversations.create(&conversation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use justai_adapter::{
        Document, InMemoryAgentRepository, InMemoryBackupRepository,
        InMemoryConversationRepository, InMemoryStore,
    };

    type Lifecycle = AgentLifecycle<
        InMemoryAgentRepository,
        InMemoryConversationRepository,
        InMemoryBackupRepository,
    >;

    fn lifecycle() -> (InMemoryStore, Lifecycle) {
        let store = InMemoryStore::new();
        let lifecycle = AgentLifecycle::new(
            InMemoryAgentRepository::new(&store),
            InMemoryConversationRepository::new(&store),
            InMemoryBackupRepository::new(&store),
        );
        (store, lifecycle)
    }

    /// Backup repository that lets a late conversation land between the
    /// steps of a workflow: created in the conversation collection while a
    /// batch is archived, or archived itself right after the archive is read.
    struct InterleavingBackups {
        inner: InMemoryBackupRepository,
        conversations: InMemoryConversationRepository,
        late: Conversation,
    }

    impl BackupRepository for InterleavingBackups {
        type Document = Document;

        async fn backup_conversations(
            &self,
            batch: BackupBatch<'_>,
        ) -> Result<(), RepositoryError> {
            self.conversations.create(&self.late).await?;
            self.inner.backup_conversations(batch).await
        }

        async fn get_conversations_by_agent_object(
            &self,
            agent: &Agent,
        ) -> Result<Vec<Document>, RepositoryError> {
            let documents = self.inner.get_conversations_by_agent_object(agent).await?;
            self.inner
                .backup_conversations(BackupBatch::One(&self.late))
                .await?;
            Ok(documents)
        }

        async fn delete_conversations_by_agent_object(
            &self,
            agent: &Agent,
        ) -> Result<(), RepositoryError> {
            self.inner.delete_conversations_by_agent_object(agent).await
        }

        async fn delete_documents(&self, documents: &[Document]) -> Result<(), RepositoryError> {
            self.inner.delete_documents(documents).await
        }
    }

    type InterleavingLifecycle = AgentLifecycle<
        InMemoryAgentRepository,
        InMemoryConversationRepository,
        InterleavingBackups,
    >;

    fn interleaving(store: &InMemoryStore, late: Conversation) -> InterleavingLifecycle {
        AgentLifecycle::new(
            InMemoryAgentRepository::new(store),
            InMemoryConversationRepository::new(store),
            InterleavingBackups {
                inner: InMemoryBackupRepository::new(store),
                conversations: InMemoryConversationRepository::new(store),
                late,
            },
        )
    }

    fn late_conversation() -> Conversation {
        Conversation::new("bot", vec![Message::user("late")])
    }

    fn bot() -> Agent {
        Agent::new("bot", "You are helpful", Vec::<String>::new())
    }

    #[tokio::test]
    async fn test_revise_propagates_to_conversations() {
        let (_, lifecycle) = lifecycle();
        lifecycle.register(&bot()).await.unwrap();
        let id = lifecycle.start_conversation(&bot(), "hi").await.unwrap();

        let updated = Agent::new("bot2", "Be terse", Vec::<String>::new());
        lifecycle.revise(&bot(), &updated).await.unwrap();

        assert_eq!(
            lifecycle.agents().get_by_name("bot2").await.unwrap(),
            Some(updated)
        );

        let conversation = lifecycle.conversations().get_by_id(&id).await.unwrap();
        assert_eq!(conversation.agent_name(), "bot2");
        assert_eq!(
            conversation.messages(),
            [Message::system("Be terse"), Message::user("hi")]
        );
    }

    #[tokio::test]
    async fn test_revise_rejected_leaves_conversations() {
        let (_, lifecycle) = lifecycle();
        let other = Agent::new("other", "Other", Vec::<String>::new());
        lifecycle.register(&bot()).await.unwrap();
        lifecycle.register(&other).await.unwrap();
        lifecycle.start_conversation(&bot(), "hi").await.unwrap();

        let err = lifecycle
            .revise(&bot(), &bot().renamed("other"))
            .await
            .unwrap_err();
        assert!(err.is_already_exists());

        let conversations = lifecycle.conversations().get_by_agent_name("bot").await.unwrap();
        assert_eq!(conversations.len(), 1);
    }

    #[tokio::test]
    async fn test_retire_archives_and_removes() {
        let (store, lifecycle) = lifecycle();
        lifecycle.register(&bot()).await.unwrap();
        lifecycle.start_conversation(&bot(), "one").await.unwrap();
        lifecycle.start_conversation(&bot(), "two").await.unwrap();

        let archived = lifecycle.retire(&bot()).await.unwrap();

        assert_eq!(archived, 2);
        assert_eq!(store.backup_count().unwrap(), 2);
        assert_eq!(store.conversation_count().unwrap(), 0);
        assert_eq!(lifecycle.agents().get_by_name("bot").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_retire_without_conversations() {
        let (store, lifecycle) = lifecycle();
        lifecycle.register(&bot()).await.unwrap();

        assert_eq!(lifecycle.retire(&bot()).await.unwrap(), 0);
        assert_eq!(store.backup_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_retire_keeps_conversation_created_meanwhile() {
        let (store, lifecycle) = lifecycle();
        lifecycle.register(&bot()).await.unwrap();
        lifecycle.start_conversation(&bot(), "one").await.unwrap();

        let racing = interleaving(&store, late_conversation());
        assert_eq!(racing.retire(&bot()).await.unwrap(), 1);

        assert_eq!(store.backup_count().unwrap(), 1);
        let remaining = lifecycle.conversations().get_by_agent_name("bot").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].messages(), [Message::user("late")]);
    }

    #[tokio::test]
    async fn test_restore_keeps_entry_archived_meanwhile() {
        let (store, lifecycle) = lifecycle();
        lifecycle.register(&bot()).await.unwrap();
        lifecycle.start_conversation(&bot(), "one").await.unwrap();
        lifecycle.retire(&bot()).await.unwrap();

        let racing = interleaving(&store, late_conversation());
        assert_eq!(racing.restore(&bot()).await.unwrap(), 1);

        let archived = lifecycle
            .backups()
            .get_conversations_by_agent_object(&bot())
            .await
            .unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(store.conversation_count().unwrap(), 1);
        let restored = lifecycle.conversations().get_by_agent_name("bot").await.unwrap();
        assert_eq!(restored[0].messages()[1], Message::user("one"));
    }

    #[tokio::test]
    async fn test_restore_round_trip() {
        let (store, lifecycle) = lifecycle();
        lifecycle.register(&bot()).await.unwrap();
        lifecycle.start_conversation(&bot(), "one").await.unwrap();
        lifecycle.retire(&bot()).await.unwrap();

        let restored = lifecycle.restore(&bot()).await.unwrap();

        assert_eq!(restored, 1);
        assert_eq!(store.backup_count().unwrap(), 0);
        let conversations = lifecycle.conversations().get_by_agent_name("bot").await.unwrap();
        assert_eq!(
            conversations[0].messages(),
            [Message::system("You are helpful"), Message::user("one")]
        );

        // Nothing left to restore
        assert_eq!(lifecycle.restore(&bot()).await.unwrap(), 0);
    }
}
