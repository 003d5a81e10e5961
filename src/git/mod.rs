//! Git operations via the system `git` binary.
//!
//! All operations shell out to `git` with `std::process::Command` so the
//! user's existing git config, hooks, and commit signing setup apply
//! unchanged.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

/// Errors from git subprocess operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// The staged diff was empty.
    #[error("There are no staged changes yet. Stage files with 'git add' first")]
    NoStagedChanges,

    /// A git command exited non-zero.
    #[error("git {operation} failed: {stderr}")]
    CommandFailed {
        /// The git operation that failed (e.g. "diff", "commit").
        operation: String,
        /// Trimmed stderr output from git.
        stderr: String,
    },

    /// The git binary could not be executed at all.
    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        /// The git operation that could not be started.
        operation: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Interface to the git operations the commit flow needs.
///
/// Implemented by [`SystemGit`] for real use; tests drive the flow with a
/// recording fake instead.
pub trait GitCli {
    /// Returns the output of `git diff --staged`. May be empty.
    fn staged_diff(&self) -> Result<String, GitError>;

    /// Creates a commit with the given message via `git commit -m`.
    fn commit(&self, message: &str) -> Result<(), GitError>;
}

/// [`GitCli`] implementation backed by the system `git` binary.
pub struct SystemGit {
    workdir: Option<PathBuf>,
}

impl SystemGit {
    /// Creates a git wrapper operating in the current directory.
    pub fn new() -> Self {
        Self { workdir: None }
    }

    /// Creates a git wrapper operating in the given directory.
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            workdir: Some(dir.into()),
        }
    }

    fn run(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(ref dir) = self.workdir {
            command.current_dir(dir);
        }

        debug!(operation, ?args, "Running git command");

        let output = command.output().map_err(|e| GitError::SpawnFailed {
            operation: operation.to_string(),
            source: e,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli for SystemGit {
    fn staged_diff(&self) -> Result<String, GitError> {
        self.run(&["diff", "--staged"], "diff")
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message], "commit")?;
        Ok(())
    }
}

/// Checks that the current directory is inside a git repository.
pub fn check_repository() -> Result<()> {
    git2::Repository::discover(".").context("Not in a git repository")?;
    Ok(())
}
