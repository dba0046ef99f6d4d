//! Completion backend abstraction and the OpenAI-compatible HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::GenerationError;

/// Maximum characters of an error body echoed into `GenerationError::Backend`.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Trait for issuing a single completion request.
///
/// This abstraction allows mocking the HTTP backend in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send `prompt` and return the text of every returned choice.
    ///
    /// A choice whose text is absent is reported as an empty string; an
    /// empty vector means the backend returned no choices at all.
    async fn complete(&self, prompt: &str) -> Result<Vec<String>, GenerationError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
    /// Legacy completions endpoints put the text here instead.
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatChoice {
    fn into_text(self) -> String {
        self.message
            .and_then(|m| m.content)
            .or(self.text)
            .unwrap_or_default()
    }
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl OpenAiBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Backend(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> Result<Vec<String>, GenerationError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            "Requesting completion from {} (model={}, prompt={} chars)",
            self.config.base_url,
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Backend(format!(
                        "request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    GenerationError::Backend(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(GenerationError::Backend(format!("HTTP {status}: {truncated}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(format!("unexpected response envelope: {e}")))?;

        Ok(parsed.choices.into_iter().map(ChatChoice::into_text).collect())
    }
}
