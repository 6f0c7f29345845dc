mod cache;
mod clock;
mod completion;
mod config;
mod error;
mod generator;
mod handlers;
mod metrics;
mod models;
mod prompt;
mod rate_limit;
mod state;

use anyhow::Context;
use clap::Parser; // for cli
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use crate::cache::{CompletionCache, cache_sweeper};
use crate::clock::{Clock, SystemClock};
use crate::completion::OpenAiClient;
use crate::config::Args;
use crate::generator::CachedCompletionClient;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional, real environment wins; loaded before tracing so RUST_LOG can live there
    let dotenv = dotenv_problem(dotenvy::dotenv());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Some(e) = dotenv {
        warn!(error = %e, "ignoring unreadable .env file");
    }

    // parse cli arguments
    let args = Args::parse();

    if args.api_key.as_deref().unwrap_or_default().is_empty() {
        warn!("OPENAI_API_KEY is not set, every generation will fail");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(CompletionCache::new(args.ttl(), args.cache_policy(), clock.clone()));
    info!(ttl_secs = args.cache_ttl, policy = ?cache.policy(), "cache configured");

    let client = OpenAiClient::new(
        &args.api_base,
        args.api_key.clone(),
        args.model.clone(),
        args.request_timeout.map(Duration::from_secs),
    )
    .context("failed to build HTTP client")?;
    info!(model = client.model(), api_base = %args.api_base, "completion client ready");

    // creating shared state
    let state = Arc::new(AppState {
        generator: Arc::new(CachedCompletionClient::new(Arc::new(client), cache.clone())),
        rate_limiter: RateLimiter::new(args.rate_limit, args.rate_window(), clock),
    });

    // spawn the background sweeper
    tokio::spawn(cache_sweeper(cache, args.sweep_interval()));

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Gateway running on http://localhost:{}", args.port);
    info!(
        "Rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

// a missing .env is fine, anything else is worth a warning
fn dotenv_problem<T>(result: Result<T, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
