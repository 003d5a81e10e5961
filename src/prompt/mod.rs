//! Prompt assembly for commit message generation.
//!
//! The system instruction is an embedded asset rather than code, so it can
//! be swapped without touching the clients: a `prompt.md` in the config
//! directory overrides the default wholesale.

use serde::Serialize;

use crate::config::ConfigManager;

/// Default system instruction, embedded at build time.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../templates/system-prompt.md");

/// Conventional commit types offered for selection.
pub const COMMIT_TYPES: &[&str] = &[
    "feat", "fix", "docs", "refactor", "style", "chore", "build", "ci", "perf", "test",
];

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction to the model.
    System,
    /// Input from the user.
    User,
    /// Prior model output.
    Assistant,
}

/// One message in the conversation sent to the completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message role.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Returns the active system instruction: the user override when present,
/// otherwise [`DEFAULT_SYSTEM_PROMPT`].
pub fn system_prompt(config: &ConfigManager) -> anyhow::Result<String> {
    Ok(config
        .prompt_override()?
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()))
}

/// Builds the conversation for a staged diff.
///
/// When a commit type was selected it is stated ahead of the diff so the
/// model favours that category.
pub fn build_messages(system: &str, diff: &str, commit_type: Option<&str>) -> Vec<Message> {
    let user_content = match commit_type {
        Some(kind) => format!("Preferred commit type: {kind}\n\n{diff}"),
        None => diff.to_string(),
    };

    vec![Message::system(system), Message::user(user_content)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_system_then_user() {
        let messages = build_messages("instruction", "diff text", None);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "instruction");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "diff text");
    }

    #[test]
    fn commit_type_prefixes_user_message() {
        let messages = build_messages("instruction", "diff text", Some("feat"));

        assert!(messages[1].content.starts_with("Preferred commit type: feat"));
        assert!(messages[1].content.ends_with("diff text"));
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn default_prompt_is_not_empty() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("git diff --staged"));
    }
}
