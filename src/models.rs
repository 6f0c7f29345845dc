use serde::{Deserialize, Serialize};

// UI -> gateway request
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct GenerateRequest {
    #[serde(default)]
    pub question: String,
}

// gateway -> UI response
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct GenerateResponse {
    pub code: String,
    pub file_name: String,
}

// UI -> gateway download request, the code the page is showing
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct DownloadRequest {
    #[serde(default)]
    pub code: String,
}

// OpenAI chat message
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

// OpenAI chat-completion request format
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
}

// OpenAI chat-completion response format (only the fields we read)
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// OpenAI error body: {"error": {"message": "..."}}
#[derive(Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub message: String,
}
