use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};
use crate::models::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Anything that went wrong while asking the chat-completion API for text.
///
/// `Clone` so that a failed outcome can sit in the cache next to successful ones.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompletionError {
    #[error("OpenAI API key not configured. Set the OPENAI_API_KEY environment variable.")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(String),
    // the upstream message is what the user needs to see
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("failed to parse API response: {0}")]
    Parse(String),
    #[error("API response contained no choices")]
    EmptyResponse,
}

/// A chat-completion backend: role-tagged messages in, first choice's text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

// OpenAI compatible /chat/completions client
pub struct OpenAiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        api_base: &str,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, CompletionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            // empty key counts as missing
            api_key: api_key.filter(|k| !k.is_empty()),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };
        debug!(model = %self.model, messages = messages.len(), "calling chat completion API");

        let res = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(parsed) => parsed.error.message,
                Err(_) if text.is_empty() => status.to_string(),
                Err(_) => text,
            };
            error!(status = status.as_u16(), %message, "chat completion API error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = res
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(CompletionError::EmptyResponse)
    }
}
