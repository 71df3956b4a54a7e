//! justai conversation command

use clap::{Args, Subcommand};
use justai_domain::{Conversation, ConversationId, ConversationRepository};

use crate::Lifecycle;

#[derive(Debug, Args)]
pub struct ConversationCommand {
    #[command(subcommand)]
    pub command: ConversationSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConversationSubcommand {
    /// List conversations
    List {
        /// Only conversations of this agent
        #[arg(short, long)]
        agent: Option<String>,
    },
    /// Print one conversation
    Show {
        /// Conversation id
        id: String,
    },
    /// Delete one conversation
    Delete {
        /// Conversation id
        id: String,
    },
}

impl ConversationCommand {
    pub async fn run(&self, lifecycle: &Lifecycle) -> anyhow::Result<()> {
        let conversations = lifecycle.conversations();
        match &self.command {
            ConversationSubcommand::List { agent } => {
                let found = match agent {
                    Some(name) => conversations.get_by_agent_name(name).await?,
                    None => conversations.get_all().await?,
                };
                if found.is_empty() {
                    println!("No conversations");
                }
                for conversation in &found {
                    println!("{}", summary(conversation));
                }
            }
            ConversationSubcommand::Show { id } => {
                let conversation = conversations
                    .get_by_id(&ConversationId::new(id.as_str()))
                    .await?;
                println!("{}", summary(&conversation));
                for message in conversation.messages() {
                    println!("  [{}] {}", message.role, message.content);
                }
            }
            ConversationSubcommand::Delete { id } => {
                conversations.delete_by_id(&ConversationId::new(id.as_str())).await?;
                println!("✓ Deleted conversation {}", id);
            }
        }
        Ok(())
    }
}

fn summary(conversation: &Conversation) -> String {
    let id = conversation
        .id()
        .map(ConversationId::as_str)
        .unwrap_or("-");
    format!(
        "{}  {}  ({} messages)",
        id,
        conversation.agent_name(),
        conversation.messages().len()
    )
}
