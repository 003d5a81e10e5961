//! Model registry loaded from an embedded YAML asset.
//!
//! Keeps per-model and per-provider parameter defaults out of code so a
//! model roster change is a data edit.

use std::collections::HashMap;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;

use super::error::AiError;
use super::Provider;

/// One supported model.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelSpec {
    /// Provider key ("openai" or "gemini").
    pub provider: String,
    /// Human-readable model name.
    pub model: String,
    /// Identifier used on the wire.
    pub api_identifier: String,
    /// Max output tokens override; provider default when absent.
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

/// Per-provider parameter defaults.
#[derive(Debug, Deserialize)]
pub struct ProviderDefaults {
    /// Default sampling temperature.
    pub temperature: f32,
    /// Default maximum output tokens.
    pub max_output_tokens: u32,
}

/// Provider configuration.
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    /// Human-readable provider name.
    pub name: String,
    /// Base URL for API requests.
    pub api_base: String,
    /// Model used when none is specified.
    pub default_model: String,
    /// Parameter defaults.
    pub defaults: ProviderDefaults,
}

#[derive(Debug, Deserialize)]
struct ModelConfiguration {
    providers: HashMap<String, ProviderConfig>,
    models: Vec<ModelSpec>,
}

/// Lookup table over the embedded model configuration.
pub struct ModelRegistry {
    config: ModelConfiguration,
    by_identifier: HashMap<String, ModelSpec>,
}

impl ModelRegistry {
    /// Loads the registry from the embedded YAML.
    pub fn load() -> Result<Self> {
        let yaml_content = include_str!("../templates/models.yaml");
        let config: ModelConfiguration = serde_yaml::from_str(yaml_content)?;

        let mut by_identifier = HashMap::new();
        for model in &config.models {
            by_identifier.insert(model.api_identifier.clone(), model.clone());
        }

        Ok(Self {
            config,
            by_identifier,
        })
    }

    /// Resolves a `--model` flag value for a provider.
    ///
    /// Accepts the exact identifier or an identifier with a dated preview
    /// suffix omitted ("gemini-2.5-flash-preview" resolves to
    /// "gemini-2.5-flash-preview-09-2025").
    pub fn resolve(&self, provider: Provider, flag: &str) -> Result<&ModelSpec, AiError> {
        if let Some(spec) = self.by_identifier.get(flag) {
            if spec.provider == provider.key() {
                return Ok(spec);
            }
        }

        let prefixed = format!("{flag}-");
        if let Some(spec) = self
            .config
            .models
            .iter()
            .find(|m| m.provider == provider.key() && m.api_identifier.starts_with(&prefixed))
        {
            return Ok(spec);
        }

        Err(AiError::UnsupportedModel {
            supported: self.supported_models(provider),
        })
    }

    /// Comma-separated supported model identifiers for a provider, with
    /// dated preview suffixes stripped and duplicates removed.
    pub fn supported_models(&self, provider: Provider) -> String {
        let mut names: Vec<String> = self
            .config
            .models
            .iter()
            .filter(|m| m.provider == provider.key())
            .map(|m| strip_preview_date(&m.api_identifier))
            .collect();
        names.dedup();
        names.join(", ")
    }

    /// Provider configuration; the embedded asset covers every variant.
    pub fn provider_config(&self, provider: Provider) -> &ProviderConfig {
        self.config
            .providers
            .get(provider.key())
            .unwrap_or_else(|| panic!("provider {} missing from models.yaml", provider.key()))
    }

    /// Default model identifier for a provider.
    pub fn default_model(&self, provider: Provider) -> &str {
        &self.provider_config(provider).default_model
    }

    /// Default temperature for a provider.
    pub fn default_temperature(&self, provider: Provider) -> f32 {
        self.provider_config(provider).defaults.temperature
    }

    /// Max output tokens for a model, falling back to the provider default.
    pub fn max_output_tokens(&self, provider: Provider, api_identifier: &str) -> u32 {
        self.by_identifier
            .get(api_identifier)
            .and_then(|spec| spec.max_output_tokens)
            .unwrap_or(self.provider_config(provider).defaults.max_output_tokens)
    }

    /// API base URL for a provider.
    pub fn api_base(&self, provider: Provider) -> &str {
        &self.provider_config(provider).api_base
    }
}

/// Strips a trailing dated preview suffix like `-09-2025`.
fn strip_preview_date(identifier: &str) -> String {
    static DATE_SUFFIX: OnceLock<Regex> = OnceLock::new();
    let re = DATE_SUFFIX
        .get_or_init(|| Regex::new(r"-\d{2}-\d{4}$").expect("valid preview suffix pattern"));
    re.replace(identifier, "").into_owned()
}

/// Global model registry instance.
static MODEL_REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

/// Returns the global model registry.
pub fn get_model_registry() -> &'static ModelRegistry {
    MODEL_REGISTRY.get_or_init(|| ModelRegistry::load().expect("Failed to load model registry"))
}
