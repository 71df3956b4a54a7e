//! # JustAI - agent and conversation store administration
//!
//! This is the main entry point that wires everything together.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  main.rs (this file) - Dependency Injection & Wiring           │
//! │    │                                                            │
//! │    ├── Loads: StoreConfig (--config file or environment)       │
//! │    ├── Opens: MongoStore, once                                 │
//! │    ├── Creates: Mongo{Agent,Conversation,Backup}Repository     │
//! │    └── Runs: one command through AgentLifecycle               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage:
//!   justai agent list
//!   justai agent create <name> --system-prompt <prompt>
//!   justai agent update <name> [--rename <name>] [--system-prompt <prompt>]
//!   justai agent retire <name>
//!   justai conversation list [--agent <name>]
//!   justai ping

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use justai_adapter::{
    MongoAgentRepository, MongoBackupRepository, MongoConversationRepository, MongoStore,
    StoreConfig,
};
use justai_usecase::AgentLifecycle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{AgentCommand, ConversationCommand};

pub type Lifecycle =
    AgentLifecycle<MongoAgentRepository, MongoConversationRepository, MongoBackupRepository>;

#[derive(Parser)]
#[command(name = "justai")]
#[command(about = "JustAI - agents, conversations and their backups")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Store configuration file (JSON). Defaults to JUSTAI_MONGO_URI.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log store calls
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage agents
    Agent(AgentCommand),
    /// Inspect and remove conversations
    Conversation(ConversationCommand),
    /// Check the store is reachable
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)?,
        None => StoreConfig::from_env()?,
    };

    // ========================================
    // Dependency Injection - Wire up the system
    // ========================================

    let store = MongoStore::connect(&config).await?;
    let lifecycle: Lifecycle = AgentLifecycle::new(
        MongoAgentRepository::new(&store),
        MongoConversationRepository::new(&store),
        MongoBackupRepository::new(&store),
    );

    match cli.command {
        Commands::Agent(cmd) => cmd.run(&lifecycle).await,
        Commands::Conversation(cmd) => cmd.run(&lifecycle).await,
        Commands::Ping => {
            store.ping().await?;
            info!(database = %config.database, "ping ok");
            println!("✓ {} is reachable", config.database);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use commands::agent::AgentSubcommand;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_agent_create() {
        let cli = Cli::try_parse_from([
            "justai",
            "agent",
            "create",
            "bot",
            "--system-prompt",
            "You are helpful",
            "-g",
            "first",
            "-g",
            "second",
        ])
        .unwrap();

        let Commands::Agent(cmd) = cli.command else {
            panic!("expected agent command");
        };
        match cmd.command {
            AgentSubcommand::Create {
                name,
                system_prompt,
                generation_prompts,
            } => {
                assert_eq!(name, "bot");
                assert_eq!(system_prompt, "You are helpful");
                assert_eq!(generation_prompts, vec!["first", "second"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["justai", "ping", "--config", "justai.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("justai.json")));
        assert!(!cli.verbose);
    }
}
