use std::sync::Arc;
use crate::generator::CachedCompletionClient;
use crate::rate_limit::RateLimiter;
// app's shared state, built once in main and handed to every handler

pub struct AppState {
    pub generator: Arc<CachedCompletionClient>,
    pub rate_limiter: RateLimiter,
}
