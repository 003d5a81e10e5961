//! Settings file management.
//!
//! Settings live in `$HOME/.ai-commit/settings.json` and act as a fallback
//! for environment variables. The same directory holds the optional system
//! prompt override (`prompt.md`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ai::Provider;

/// Persisted user settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// OpenAI API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// Google Gemini API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// Provider used when no `--provider` flag is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,

    /// Model used when no `--model` flag is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl Settings {
    /// Returns the stored API key for a provider, if any.
    pub fn key_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai_api_key.as_deref(),
            Provider::Gemini => self.gemini_api_key.as_deref(),
        }
    }

    fn set_key_for(&mut self, provider: Provider, key: String) {
        match provider {
            Provider::OpenAi => self.openai_api_key = Some(key),
            Provider::Gemini => self.gemini_api_key = Some(key),
        }
    }
}

/// Loads and saves settings from the config directory.
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager using the default directory (`$HOME/.ai-commit`).
    pub fn new() -> Self {
        Self {
            config_dir: default_config_dir(),
        }
    }

    /// Creates a manager rooted at a specific directory.
    pub fn with_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            config_dir: dir.into(),
        }
    }

    /// Path of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Path of the optional system prompt override.
    pub fn prompt_override_path(&self) -> PathBuf {
        self.config_dir.join("prompt.md")
    }

    /// Loads settings, returning defaults when the file does not exist.
    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Saves settings, creating the config directory if needed.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.config_dir).with_context(|| {
            format!(
                "Failed to create settings directory: {}",
                self.config_dir.display()
            )
        })?;

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        let path = self.settings_path();
        fs::write(&path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Stores an API key for a provider.
    pub fn set_api_key(&self, provider: Provider, key: String) -> Result<()> {
        let mut settings = self.load_settings()?;
        settings.set_key_for(provider, key);
        self.save_settings(&settings)
    }

    /// Resolves the API key for a provider.
    ///
    /// Lookup order: the provider-specific environment variable, the
    /// provider-agnostic `AI_COMMIT_API_KEY`, then the settings file.
    pub fn api_key(&self, provider: Provider) -> Option<String> {
        if let Ok(key) = env::var(provider.env_var()) {
            if !key.is_empty() {
                return Some(key);
            }
        }

        if let Ok(key) = env::var("AI_COMMIT_API_KEY") {
            if !key.is_empty() {
                return Some(key);
            }
        }

        self.load_settings()
            .ok()
            .and_then(|s| s.key_for(provider).map(String::from))
    }

    /// Reads the system prompt override, if the file exists.
    pub fn prompt_override(&self) -> Result<Option<String>> {
        let path = self.prompt_override_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = read_prompt_file(&path)?;
        Ok(Some(content))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ai-commit")
}

fn read_prompt_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompt override: {}", path.display()))
}
