//! OpenAI chat-completions API client.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AiError, ClientMetadata, CompletionClient, REQUEST_TIMEOUT};
use crate::prompt::Message;

/// Chat-completions request body.
#[derive(Serialize, Debug)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// `base_url` normally comes from the model registry; tests point it at
    /// a local mock server.
    pub fn new(
        model: String,
        api_key: String,
        base_url: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url,
            temperature,
            max_tokens,
        })
    }

    fn api_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/v1/chat/completions")
    }
}

impl CompletionClient for OpenAiClient {
    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let request = OpenAiRequest {
                model: &self.model,
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let api_url = self.api_url();
            info!(url = %api_url, model = %self.model, "Sending request to OpenAI API");
            debug!(
                message_count = messages.len(),
                temperature = self.temperature,
                max_tokens = self.max_tokens,
                "Built OpenAI request payload"
            );

            let response = self
                .client
                .post(&api_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| AiError::Network(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(AiError::ApiRequestFailed { status, body }.into());
            }

            let openai_response: OpenAiResponse = response
                .json()
                .await
                .map_err(|e| AiError::InvalidResponseFormat(e.to_string()))?;

            let content = openai_response
                .choices
                .first()
                .map(|choice| choice.message.content.trim().to_string())
                .ok_or_else(|| {
                    AiError::InvalidResponseFormat("No choices in response".to_string())
                })?;

            debug!(response_len = content.len(), "Extracted completion text");

            Ok(content)
        })
    }

    fn metadata(&self) -> ClientMetadata {
        ClientMetadata {
            provider: "OpenAI".to_string(),
            model: self.model.clone(),
        }
    }
}
