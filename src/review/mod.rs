//! Interactive review of generated commit messages.
//!
//! Drives the loop: show the proposed message, then accept (commit), edit,
//! regenerate, or discard. Regeneration re-sends the same conversation, so
//! the diff is only read once per invocation.

use anyhow::{Context, Result};
use dialoguer::{Input, Select};

use crate::ai::CompletionClient;
use crate::git::{GitCli, GitError};
use crate::prompt::{self, COMMIT_TYPES};

/// What the user chose to do with the proposed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Commit the message as shown.
    Accept,
    /// Replace the message with user-entered text.
    Edit,
    /// Request a fresh completion for the same diff.
    Regenerate,
    /// Stop without committing.
    Discard,
}

/// Terminal outcome of the review loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// A commit was created with this message.
    Committed(String),
    /// The user discarded the message; nothing was committed.
    Discarded,
}

/// User interaction needed by the commit flow.
///
/// Implemented with `dialoguer` prompts for real use; tests script the
/// answers instead.
pub trait ReviewPrompter {
    /// Asks for a conventional commit type.
    fn select_commit_type(&mut self) -> Result<String>;

    /// Asks what to do with the currently proposed message.
    fn select_action(&mut self) -> Result<ReviewAction>;

    /// Asks for a replacement commit message, pre-filled with the current
    /// one. Must not return an empty message.
    fn edit_message(&mut self, current: &str) -> Result<String>;
}

/// [`ReviewPrompter`] backed by interactive terminal prompts.
pub struct TerminalPrompter;

impl ReviewPrompter for TerminalPrompter {
    fn select_commit_type(&mut self) -> Result<String> {
        let index = Select::new()
            .with_prompt("Select preferred commit type")
            .items(COMMIT_TYPES)
            .default(0)
            .interact()
            .context("Commit type selection cancelled")?;

        Ok(COMMIT_TYPES[index].to_string())
    }

    fn select_action(&mut self) -> Result<ReviewAction> {
        let index = Select::new()
            .with_prompt("What would you like to do?")
            .items(&[
                "Accept and commit",
                "Edit the message",
                "Regenerate",
                "Discard",
            ])
            .default(0)
            .interact()
            .context("Action selection cancelled")?;

        Ok(match index {
            0 => ReviewAction::Accept,
            1 => ReviewAction::Edit,
            2 => ReviewAction::Regenerate,
            _ => ReviewAction::Discard,
        })
    }

    fn edit_message(&mut self, current: &str) -> Result<String> {
        let edited: String = Input::new()
            .with_prompt("Please enter the new commit message")
            .with_initial_text(current)
            .validate_with(|input: &String| validate_message(input))
            .interact_text()
            .context("Message input cancelled")?;

        Ok(edited.trim().to_string())
    }
}

/// Rejects empty replacement messages.
fn validate_message(input: &str) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("Commit message is required")
    } else {
        Ok(())
    }
}

/// Runs the full generate-and-review flow.
///
/// Reads the staged diff, requests a completion, then loops on user actions
/// until the message is committed or discarded.
pub async fn run(
    git: &dyn GitCli,
    client: &dyn CompletionClient,
    prompter: &mut dyn ReviewPrompter,
    system_prompt: &str,
    commit_type: Option<&str>,
) -> Result<ReviewOutcome> {
    let diff = git.staged_diff()?;
    if diff.trim().is_empty() {
        return Err(GitError::NoStagedChanges.into());
    }

    let messages = prompt::build_messages(system_prompt, &diff, commit_type);

    let metadata = client.metadata();
    println!(
        "Generating commit message with {} ({})...",
        metadata.provider, metadata.model
    );

    let mut message = client.complete(&messages).await?;

    loop {
        print_proposal(&message);

        match prompter.select_action()? {
            ReviewAction::Accept => {
                git.commit(&message)?;
                print_status("Commit successful!");
                return Ok(ReviewOutcome::Committed(message));
            }
            ReviewAction::Edit => {
                message = prompter.edit_message(&message)?;
            }
            ReviewAction::Regenerate => {
                println!("Regenerating...");
                message = client.complete(&messages).await?;
            }
            ReviewAction::Discard => {
                print_status("Commit message discarded.");
                return Ok(ReviewOutcome::Discarded);
            }
        }
    }
}

/// Prints the proposed message highlighted, set off by blank lines.
fn print_proposal(message: &str) {
    println!("\n\x1b[33m{message}\x1b[0m\n");
}

fn print_status(status: &str) {
    println!("\x1b[32m{status}\x1b[0m");
}
