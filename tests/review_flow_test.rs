//! End-to-end tests of the generate-and-review flow against scripted
//! doubles for the completion client, git, and the user.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use anyhow::Result;

use ai_commit::ai::{ClientMetadata, CompletionClient};
use ai_commit::git::{GitCli, GitError};
use ai_commit::prompt::Message;
use ai_commit::review::{self, ReviewAction, ReviewOutcome, ReviewPrompter};

/// Completion client that replays scripted responses and records every
/// conversation it was sent.
struct FakeClient {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl FakeClient {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[index].clone()
    }
}

impl CompletionClient for FakeClient {
    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(messages.to_vec());
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left");
            Ok(response)
        })
    }

    fn metadata(&self) -> ClientMetadata {
        ClientMetadata {
            provider: "Fake".to_string(),
            model: "fake-model".to_string(),
        }
    }
}

/// Git double that serves a fixed diff and records commits.
struct RecordingGit {
    diff: String,
    commits: Mutex<Vec<String>>,
}

impl RecordingGit {
    fn with_diff(diff: &str) -> Self {
        Self {
            diff: diff.to_string(),
            commits: Mutex::new(Vec::new()),
        }
    }

    fn commits(&self) -> Vec<String> {
        self.commits.lock().unwrap().clone()
    }
}

impl GitCli for RecordingGit {
    fn staged_diff(&self) -> Result<String, GitError> {
        Ok(self.diff.clone())
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.commits.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Prompter that replays scripted actions and edits.
struct ScriptedPrompter {
    actions: VecDeque<ReviewAction>,
    edits: VecDeque<String>,
}

impl ScriptedPrompter {
    fn new(actions: &[ReviewAction]) -> Self {
        Self {
            actions: actions.iter().copied().collect(),
            edits: VecDeque::new(),
        }
    }

    fn with_edits(mut self, edits: &[&str]) -> Self {
        self.edits = edits.iter().map(|e| e.to_string()).collect();
        self
    }
}

impl ReviewPrompter for ScriptedPrompter {
    fn select_commit_type(&mut self) -> Result<String> {
        Ok("feat".to_string())
    }

    fn select_action(&mut self) -> Result<ReviewAction> {
        Ok(self.actions.pop_front().expect("no scripted action left"))
    }

    fn edit_message(&mut self, _current: &str) -> Result<String> {
        Ok(self.edits.pop_front().expect("no scripted edit left"))
    }
}

const DIFF: &str = "diff --git a/login.rs b/login.rs\n+fn login() {}\n";

#[tokio::test]
async fn accepting_commits_the_generated_message_once() {
    let client = FakeClient::new(&["feat: add login"]);
    let git = RecordingGit::with_diff(DIFF);
    let mut prompter = ScriptedPrompter::new(&[ReviewAction::Accept]);

    let outcome = review::run(&git, &client, &mut prompter, "system", None)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReviewOutcome::Committed("feat: add login".to_string())
    );
    assert_eq!(git.commits(), vec!["feat: add login".to_string()]);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn edited_message_is_committed_instead_of_generated_text() {
    let client = FakeClient::new(&["feat: add login"]);
    let git = RecordingGit::with_diff(DIFF);
    let mut prompter = ScriptedPrompter::new(&[ReviewAction::Edit, ReviewAction::Accept])
        .with_edits(&["Rework login flow"]);

    let outcome = review::run(&git, &client, &mut prompter, "system", None)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReviewOutcome::Committed("Rework login flow".to_string())
    );
    assert_eq!(git.commits(), vec!["Rework login flow".to_string()]);
    // Editing must not trigger another completion request.
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn discarding_never_commits() {
    let client = FakeClient::new(&["feat: add login"]);
    let git = RecordingGit::with_diff(DIFF);
    let mut prompter = ScriptedPrompter::new(&[ReviewAction::Discard]);

    let outcome = review::run(&git, &client, &mut prompter, "system", None)
        .await
        .unwrap();

    assert_eq!(outcome, ReviewOutcome::Discarded);
    assert!(git.commits().is_empty());
}

#[tokio::test]
async fn regenerating_resends_the_same_conversation() {
    let client = FakeClient::new(&["first proposal", "second proposal"]);
    let git = RecordingGit::with_diff(DIFF);
    let mut prompter = ScriptedPrompter::new(&[ReviewAction::Regenerate, ReviewAction::Accept]);

    let outcome = review::run(&git, &client, &mut prompter, "system", Some("fix"))
        .await
        .unwrap();

    assert_eq!(client.request_count(), 2);

    let first = client.request(0);
    let second = client.request(1);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.role, b.role);
        assert_eq!(a.content, b.content);
    }

    assert_eq!(
        outcome,
        ReviewOutcome::Committed("second proposal".to_string())
    );
}

#[tokio::test]
async fn empty_diff_fails_before_any_completion_request() {
    let client = FakeClient::new(&[]);
    let git = RecordingGit::with_diff("");
    let mut prompter = ScriptedPrompter::new(&[]);

    let err = review::run(&git, &client, &mut prompter, "system", None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no staged changes"));
    assert_eq!(client.request_count(), 0);
    assert!(git.commits().is_empty());
}

#[tokio::test]
async fn commit_type_is_folded_into_the_user_message() {
    let client = FakeClient::new(&["fix: correct login"]);
    let git = RecordingGit::with_diff(DIFF);
    let mut prompter = ScriptedPrompter::new(&[ReviewAction::Accept]);

    review::run(&git, &client, &mut prompter, "system", Some("fix"))
        .await
        .unwrap();

    let request = client.request(0);
    assert!(request[1].content.starts_with("Preferred commit type: fix"));
    assert!(request[1].content.contains(DIFF));
}
