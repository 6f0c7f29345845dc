use clap::Parser;
use std::time::Duration;
use crate::cache::CachePolicy;

// CLI argument structure, upstream and cache flags can also come from the environment (or .env)
#[derive(Parser, Debug, Clone)]
#[command(name = "codegen-gateway")]
#[command(about = "Turns coding questions into downloadable Python files via OpenAI")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Chat-completion API base url
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub api_base: String,

    // Model used for every completion
    #[arg(short, long, env = "OPENAI_MODEL", default_value = "gpt-4")]
    pub model: String,

    // API key, missing key makes every generation fail with an auth error
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // Cache TTL in seconds
    #[arg(short, long, env = "CACHE_TTL", default_value_t = 3600)]
    pub cache_ttl: u64,

    // Also memoize failed generations for the whole TTL
    #[arg(long, env = "CACHE_FAILURES", default_value_t = false)]
    pub cache_failures: bool,

    // Seconds between sweeps of expired cache entries
    #[arg(long, default_value_t = 300)]
    pub sweep_interval: u64,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // Upstream request timeout in seconds (client default when unset)
    #[arg(long)]
    pub request_timeout: Option<u64>,
}

impl Args {
    pub fn cache_policy(&self) -> CachePolicy {
        if self.cache_failures {
            CachePolicy::Everything
        } else {
            CachePolicy::SuccessOnly
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }
}
