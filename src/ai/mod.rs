//! Completion client trait, provider selection, and client construction.

pub mod error;
pub mod gemini;
pub mod models;
pub mod openai;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::ConfigManager;
use crate::prompt::Message;

pub use error::AiError;
pub use gemini::GeminiClient;
pub use models::{get_model_registry, ModelRegistry};
pub use openai::OpenAiClient;

/// Request timeout applied to every completion call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Metadata about a completion client.
#[derive(Clone, Debug)]
pub struct ClientMetadata {
    /// Service provider name.
    pub provider: String,
    /// Model identifier.
    pub model: String,
}

/// Trait for chat-completion API clients.
pub trait CompletionClient: Send + Sync {
    /// Sends the conversation to the API and returns the first candidate's
    /// text content.
    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    /// Returns metadata about the client.
    fn metadata(&self) -> ClientMetadata;
}

/// Supported completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// OpenAI chat completions.
    OpenAi,
    /// Google Gemini generateContent.
    Gemini,
}

impl Provider {
    /// Registry and settings key for the provider.
    pub fn key(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// Environment variable holding the provider's API key.
    pub fn env_var(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Human-readable provider name.
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Google Gemini",
        }
    }

    /// Parses a provider name as given on the CLI or in settings.
    pub fn from_flag(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "openai" => Some(Provider::OpenAi),
            "gemini" | "google" => Some(Provider::Gemini),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Generation parameters taken from the CLI, all optional.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Model identifier (`--model`).
    pub model: Option<String>,
    /// Sampling temperature (`--temperature`).
    pub temperature: Option<f32>,
    /// Maximum output tokens (`--tokens`).
    pub max_tokens: Option<u32>,
}

/// Builds the completion client for a provider, resolving the model,
/// parameter defaults, and API key.
///
/// Fails before any network traffic when the model is unknown or no API key
/// can be found.
pub fn build_client(
    provider: Provider,
    options: &GenerationOptions,
    config: &ConfigManager,
) -> Result<Box<dyn CompletionClient>> {
    let registry = get_model_registry();
    let settings = config.load_settings()?;

    let model = match options.model.as_deref().or(settings.default_model.as_deref()) {
        Some(flag) => registry.resolve(provider, flag)?.api_identifier.clone(),
        None => registry.default_model(provider).to_string(),
    };

    let temperature = options
        .temperature
        .unwrap_or_else(|| registry.default_temperature(provider));
    let max_tokens = options
        .max_tokens
        .unwrap_or_else(|| registry.max_output_tokens(provider, &model));

    let api_key = config.api_key(provider).ok_or_else(|| AiError::ApiKeyNotFound {
        provider: provider.display_name().to_string(),
        env_var: provider.env_var().to_string(),
    })?;

    let base_url = registry.api_base(provider).to_string();

    let client: Box<dyn CompletionClient> = match provider {
        Provider::OpenAi => Box::new(
            OpenAiClient::new(model, api_key, base_url, temperature, max_tokens)
                .context("Failed to build OpenAI client")?,
        ),
        Provider::Gemini => Box::new(
            GeminiClient::new(model, api_key, base_url, temperature, max_tokens)
                .context("Failed to build Gemini client")?,
        ),
    };

    Ok(client)
}
