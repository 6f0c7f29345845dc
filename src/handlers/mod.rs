mod download;
mod generate;
mod health;
mod index;
mod metrics;

use axum::{Router, routing::{get, post}};
use std::sync::Arc;
use crate::state::AppState;

pub use download::{download_file_name, download_handler};
pub use generate::generate_handler;
pub use health::health_handler;
pub use index::index_handler;
pub use metrics::metrics_handler;

// all routes of the gateway
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/download", post(download_handler))
        .with_state(state)
}
