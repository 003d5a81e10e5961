//! CLI interface for ai-commit.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commit;
pub mod config;

use crate::ai::Provider;

/// ai-commit: generate commit messages from the staged diff.
#[derive(Parser)]
#[command(name = "ai-commit")]
#[command(about = "Generate commit messages from the staged diff", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generates a commit message and commits on acceptance.
    Commit(commit::CommitCommand),
    /// Manages stored configuration.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Commit(commit_cmd) => commit_cmd.execute().await,
            Commands::Config(config_cmd) => config_cmd.execute(),
        }
    }
}

/// Parses a `--provider` flag value.
pub(crate) fn parse_provider(value: &str) -> Result<Provider, String> {
    Provider::from_flag(value)
        .ok_or_else(|| format!("Unknown provider '{value}'. Supported providers are: openai, gemini"))
}
