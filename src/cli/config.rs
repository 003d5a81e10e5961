//! The `config` command: manage stored settings.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::ai::Provider;
use crate::config::ConfigManager;

/// Configuration management.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Stores an API key in the settings file.
    #[command(name = "set-key")]
    SetKey(SetKeyCommand),
}

/// Stores an API key.
#[derive(Parser)]
pub struct SetKeyCommand {
    /// The API key to store.
    pub key: String,

    /// Provider the key belongs to (openai or gemini).
    #[arg(long, value_parser = crate::cli::parse_provider, default_value = "openai")]
    pub provider: Provider,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::SetKey(set_key_cmd) => set_key_cmd.execute(),
        }
    }
}

impl SetKeyCommand {
    /// Executes the set-key command.
    pub fn execute(self) -> Result<()> {
        let config = ConfigManager::new();
        config.set_api_key(self.provider, self.key)?;

        println!(
            "Saved {} API key to {}",
            self.provider,
            config.settings_path().display()
        );

        Ok(())
    }
}
