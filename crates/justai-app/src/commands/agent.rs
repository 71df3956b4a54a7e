//! justai agent command

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use justai_domain::{Agent, AgentRepository};

use crate::Lifecycle;

#[derive(Debug, Args)]
pub struct AgentCommand {
    #[command(subcommand)]
    pub command: AgentSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum AgentSubcommand {
    /// List all agents
    List,
    /// Show one agent
    Show {
        /// Agent name
        name: String,
    },
    /// Create an agent
    Create {
        /// Agent name (must be unique)
        name: String,
        /// System prompt
        #[arg(short, long)]
        system_prompt: String,
        /// Dataset generation prompt (repeatable)
        #[arg(short, long = "generation-prompt")]
        generation_prompts: Vec<String>,
    },
    /// Rename an agent or change its system prompt; conversations follow
    Update {
        /// Current agent name
        name: String,
        /// New name
        #[arg(long)]
        rename: Option<String>,
        /// New system prompt
        #[arg(short, long)]
        system_prompt: Option<String>,
    },
    /// Archive the agent's conversations, then delete the agent
    Retire {
        /// Agent name
        name: String,
    },
    /// Restore archived conversations of an agent
    Restore {
        /// Agent name
        name: String,
    },
}

impl AgentCommand {
    pub async fn run(&self, lifecycle: &Lifecycle) -> anyhow::Result<()> {
        match &self.command {
            AgentSubcommand::List => {
                let agents = lifecycle.agents().get_all().await?;
                if agents.is_empty() {
                    println!("No agents");
                }
                for agent in &agents {
                    println!("{}", agent.name());
                }
            }
            AgentSubcommand::Show { name } => {
                let agent = find(lifecycle, name).await?;
                println!("Name: {}", agent.name());
                println!("System prompt: {}", agent.system_prompt());
                println!("Dataset generation prompts:");
                for (i, prompt) in agent.dataset_generation_prompts().iter().enumerate() {
                    println!("  {}. {}", i + 1, prompt);
                }
            }
            AgentSubcommand::Create {
                name,
                system_prompt,
                generation_prompts,
            } => {
                let agent = Agent::new(
                    name.as_str(),
                    system_prompt.as_str(),
                    generation_prompts.iter().cloned(),
                );
                lifecycle.register(&agent).await?;
                println!("✓ Created agent {}", name);
            }
            AgentSubcommand::Update {
                name,
                rename,
                system_prompt,
            } => {
                if rename.is_none() && system_prompt.is_none() {
                    bail!("nothing to update: pass --rename and/or --system-prompt");
                }

                let current = find(lifecycle, name).await?;
                let mut updated = current.clone();
                if let Some(new_name) = rename {
                    updated = updated.renamed(new_name.as_str());
                }
                if let Some(prompt) = system_prompt {
                    updated = updated.with_system_prompt(prompt.as_str());
                }

                lifecycle.revise(&current, &updated).await?;
                println!("✓ Updated agent {}", updated.name());
            }
            AgentSubcommand::Retire { name } => {
                let agent = find(lifecycle, name).await?;
                let archived = lifecycle.retire(&agent).await?;
                println!("✓ Retired {} ({} conversations archived)", name, archived);
            }
            AgentSubcommand::Restore { name } => {
                // The agent itself may be gone; archive entries are keyed by name only
                let agent = match lifecycle.agents().get_by_name(name).await? {
                    Some(agent) => agent,
                    None => Agent::new(name.as_str(), "", Vec::<String>::new()),
                };
                let restored = lifecycle.restore(&agent).await?;
                println!("✓ Restored {} conversations for {}", restored, name);
            }
        }
        Ok(())
    }
}

async fn find(lifecycle: &Lifecycle, name: &str) -> anyhow::Result<Agent> {
    lifecycle
        .agents()
        .get_by_name(name)
        .await?
        .with_context(|| format!("Agent {} does not exist", name))
}
