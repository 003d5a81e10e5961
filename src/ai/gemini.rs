//! Google Gemini generateContent API client.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AiError, ClientMetadata, CompletionClient, REQUEST_TIMEOUT};
use crate::prompt::{Message, Role};

#[derive(Serialize, Debug)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
struct ContentBlock<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

/// generateContent request body.
///
/// System messages map to `system_instruction`, user messages to `contents`;
/// assistant turns never occur in this tool's conversations.
#[derive(Serialize, Debug)]
struct GeminiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ContentBlock<'a>>,
    contents: Vec<ContentBlock<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: String,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

/// Google Gemini generateContent client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiClient {
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
        format!(
            "{base}/v1beta/models/{model}:generateContent",
            model = self.model
        )
    }

    fn build_request<'a>(&self, messages: &'a [Message]) -> GeminiRequest<'a> {
        let mut system_instruction = None;
        let mut contents = Vec::new();

        for message in messages {
            match message.role {
                Role::System => {
                    system_instruction = Some(ContentBlock {
                        parts: vec![Part {
                            text: &message.content,
                        }],
                    });
                }
                Role::User | Role::Assistant => {
                    contents.push(ContentBlock {
                        parts: vec![Part {
                            text: &message.content,
                        }],
                    });
                }
            }
        }

        GeminiRequest {
            system_instruction,
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
                response_mime_type: "text/plain",
            },
        }
    }
}

impl CompletionClient for GeminiClient {
    fn complete<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let request = self.build_request(messages);

            let api_url = self.api_url();
            info!(url = %api_url, model = %self.model, "Sending request to Gemini API");
            debug!(
                content_count = request.contents.len(),
                temperature = self.temperature,
                max_output_tokens = self.max_tokens,
                "Built Gemini request payload"
            );

            let response = self
                .client
                .post(&api_url)
                .query(&[("key", self.api_key.as_str())])
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

            let gemini_response: GeminiResponse = response
                .json()
                .await
                .map_err(|e| AiError::InvalidResponseFormat(e.to_string()))?;

            let content = gemini_response
                .candidates
                .first()
                .and_then(|candidate| candidate.content.parts.first())
                .map(|part| part.text.trim().to_string())
                .ok_or_else(|| {
                    AiError::InvalidResponseFormat("No candidates in response".to_string())
                })?;

            debug!(response_len = content.len(), "Extracted completion text");

            Ok(content)
        })
    }

    fn metadata(&self) -> ClientMetadata {
        ClientMetadata {
            provider: "Google Gemini".to_string(),
            model: self.model.clone(),
        }
    }
}
