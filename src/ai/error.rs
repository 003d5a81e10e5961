//! Completion API error handling.

use thiserror::Error;

/// Errors from the completion clients and their configuration.
#[derive(Error, Debug)]
pub enum AiError {
    /// No API key could be resolved for the selected provider.
    #[error(
        "{provider} API key not found. Set {env_var} or run 'ai-commit config set-key <KEY>'"
    )]
    ApiKeyNotFound {
        /// Human-readable provider name.
        provider: String,
        /// Environment variable that would have been read.
        env_var: String,
    },

    /// The model flag did not name a supported model.
    #[error("Wrong model option! Currently supported models are: {supported}")]
    UnsupportedModel {
        /// Comma-separated list of supported model identifiers.
        supported: String,
    },

    /// The API returned a non-success status.
    #[error("API request failed: HTTP {status}: {body}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The response did not contain the expected content.
    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    /// Transport-level failure (connection error, timeout).
    #[error("Network error: {0}")]
    Network(String),
}
