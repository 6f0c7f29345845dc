use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("codegen_requests_total", "Total number of generate requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("codegen_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("codegen_cache_misses_total", "Total cache misses").unwrap();
    pub static ref UPSTREAM_ERRORS: Counter =
        register_counter!("codegen_upstream_errors_total", "Failed chat completion calls").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "codegen_request_latency_seconds",
        "Generate request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("codegen_cache_size", "Current number of items in cache").unwrap();
}

// Text exposition of everything in the default registry
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| e.to_string())?;
    String::from_utf8(buffer).map_err(|e| e.to_string())
}
