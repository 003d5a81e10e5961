//! The `commit` command: generate, review, and create a commit.

use anyhow::Result;
use clap::Parser;

use crate::ai::{self, GenerationOptions, Provider};
use crate::config::ConfigManager;
use crate::git::{self, SystemGit};
use crate::prompt::{self, COMMIT_TYPES};
use crate::review::{self, ReviewPrompter, TerminalPrompter};

/// Automatically generate commit messages.
#[derive(Parser)]
pub struct CommitCommand {
    /// ID of the model to use.
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Sampling temperature, between 0 and 2.
    #[arg(short = 't', long, value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// Maximum number of tokens to generate.
    #[arg(short = 'k', long = "tokens", value_parser = parse_tokens)]
    pub tokens: Option<u32>,

    /// Completion provider (openai or gemini).
    #[arg(long, value_parser = crate::cli::parse_provider)]
    pub provider: Option<Provider>,

    /// Conventional commit type; selected interactively when omitted.
    #[arg(long = "type", value_parser = parse_commit_type)]
    pub commit_type: Option<String>,
}

impl CommitCommand {
    /// Executes the commit command.
    pub async fn execute(self) -> Result<()> {
        git::check_repository()?;

        let config = ConfigManager::new();
        let settings = config.load_settings()?;

        let provider = self
            .provider
            .or_else(|| {
                settings
                    .default_provider
                    .as_deref()
                    .and_then(Provider::from_flag)
            })
            .unwrap_or(Provider::OpenAi);

        let options = GenerationOptions {
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.tokens,
        };

        // Flag, model, and key validation all happen here, before the diff
        // is read or any request is sent.
        let client = ai::build_client(provider, &options, &config)?;

        let mut prompter = TerminalPrompter;
        let commit_type = match self.commit_type {
            Some(kind) => kind,
            None => prompter.select_commit_type()?,
        };

        let system = prompt::system_prompt(&config)?;
        let system_git = SystemGit::new();

        review::run(
            &system_git,
            client.as_ref(),
            &mut prompter,
            &system,
            Some(&commit_type),
        )
        .await?;

        Ok(())
    }
}

/// Validates the `--temperature` flag.
fn parse_temperature(value: &str) -> Result<f32, String> {
    let temperature: f32 = value
        .parse()
        .map_err(|_| "Temperature must be a positive float between 0 and 2!".to_string())?;

    if !(0.0..=2.0).contains(&temperature) {
        return Err("Temperature must be a positive float between 0 and 2!".to_string());
    }

    Ok(temperature)
}

/// Validates the `--tokens` flag.
fn parse_tokens(value: &str) -> Result<u32, String> {
    let tokens: u32 = value
        .parse()
        .map_err(|_| "Maximum number of tokens must be a positive integer more than 0!".to_string())?;

    if tokens == 0 {
        return Err("Maximum number of tokens must be a positive integer more than 0!".to_string());
    }

    Ok(tokens)
}

/// Validates the `--type` flag.
fn parse_commit_type(value: &str) -> Result<String, String> {
    if COMMIT_TYPES.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "Unknown commit type '{value}'. Supported types are: {}",
            COMMIT_TYPES.join(", ")
        ))
    }
}
