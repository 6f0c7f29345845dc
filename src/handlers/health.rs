use axum::{Json, response::IntoResponse};

// health handler
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use crate::completion::mock::MockCompletionClient;
    use crate::handlers::test_support::{app, body_string};
    use axum::{body::Body, http::{Request, StatusCode}};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn reports_healthy() {
        let app = app(Arc::new(MockCompletionClient::replying("")), 10);
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }
}
