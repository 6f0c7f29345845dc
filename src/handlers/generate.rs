use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use crate::error::AppError;
use crate::handlers::download_file_name;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{GenerateRequest, GenerateResponse};
use crate::state::AppState;

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    REQUEST_TOTAL.inc();

    // empty input never reaches the completion client
    if payload.question.is_empty() {
        return Err(AppError::EmptyQuestion);
    }

    if !state.rate_limiter.check("global") {
        return Err(AppError::RateLimited);
    }

    let start_time = Instant::now();
    info!(chars = payload.question.len(), "generating code");

    let result = state.generator.get_or_generate(&payload.question).await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    let code = result?;
    Ok(Json(GenerateResponse {
        code,
        file_name: download_file_name(chrono::Local::now()),
    }))
}

#[cfg(test)]
mod tests {
    use crate::completion::mock::MockCompletionClient;
    use crate::error::EMPTY_QUESTION_WARNING;
    use crate::handlers::test_support::{app, body_string};
    use axum::{body::Body, http::{Request, StatusCode}};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn generate(question: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "question": question }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn returns_generated_code() {
        let mock = Arc::new(MockCompletionClient::replying("print('hi')"));
        let res = app(mock.clone(), 10).oneshot(generate("print hi")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["code"], "print('hi')");
        let file_name = body["file_name"].as_str().unwrap();
        assert!(file_name.starts_with("main_") && file_name.ends_with(".py"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_question_is_a_warning_without_api_call() {
        let mock = Arc::new(MockCompletionClient::replying("print('hi')"));
        let res = app(mock.clone(), 10).oneshot(generate("")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["warning"], EMPTY_QUESTION_WARNING);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn whitespace_question_is_forwarded() {
        let mock = Arc::new(MockCompletionClient::replying("pass"));
        let res = app(mock.clone(), 10).oneshot(generate("   ")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let mock = Arc::new(MockCompletionClient::failing("rate limited"));
        let res = app(mock, 10).oneshot(generate("x")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["error"], "Error: rate limited");
    }

    #[tokio::test]
    async fn repeated_question_is_served_from_cache() {
        let mock = Arc::new(MockCompletionClient::replying("print('hi')"));
        let app = app(mock.clone(), 10);

        for _ in 0..3 {
            let res = app.clone().oneshot(generate("print hi")).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn rate_limit_rejects_excess_requests() {
        let mock = Arc::new(MockCompletionClient::replying("print('hi')"));
        let app = app(mock, 1);

        let first = app.clone().oneshot(generate("a")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let second = app.oneshot(generate("b")).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
