use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;
use crate::completion::CompletionError;

pub const EMPTY_QUESTION_WARNING: &str = "Please enter a coding question to generate the code.";

// Everything a handler can answer with besides success
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", EMPTY_QUESTION_WARNING)]
    EmptyQuestion,
    #[error("Generate some code before downloading it.")]
    NothingToDownload,
    #[error("Rate limit exceeded. Try again later.")]
    RateLimited,
    #[error("Error: {0}")]
    Generation(#[from] CompletionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, field) = match &self {
            // a warning, not an error: nothing was attempted
            AppError::EmptyQuestion | AppError::NothingToDownload => (StatusCode::BAD_REQUEST, "warning"),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "error"),
            AppError::Generation(_) => (StatusCode::BAD_GATEWAY, "error"),
        };
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), self.to_string().into());
        (status, Json(serde_json::Value::Object(body))).into_response()
    }
}
