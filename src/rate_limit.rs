use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::clock::Clock;

// Rate limit entry - tracks requests per key
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

// Fixed window limiter in front of the paid upstream API
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    limit: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            limit,
            window,
            clock,
        }
    }

    // true when the request may go through
    pub fn check(&self, key: &str) -> bool {
        let now = self.clock.now();

        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                window_start: now,
            });

        // window expired..? Reset it
        if now.saturating_duration_since(entry.window_start) > self.window {
            entry.count = 1;
            entry.window_start = now;
            return true;
        }

        // under limit.? Allow
        if entry.count < self.limit {
            entry.count += 1;
            return true;
        }

        // over limit
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter(limit: u32) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (RateLimiter::new(limit, Duration::from_secs(60), clock.clone()), clock)
    }

    #[test]
    fn allows_up_to_limit_then_blocks() {
        let (limiter, _) = limiter(3);
        assert!(limiter.check("global"));
        assert!(limiter.check("global"));
        assert!(limiter.check("global"));
        assert!(!limiter.check("global"));
    }

    #[test]
    fn window_expiry_resets_count() {
        let (limiter, clock) = limiter(1);
        assert!(limiter.check("global"));
        assert!(!limiter.check("global"));

        clock.advance(Duration::from_secs(61));
        assert!(limiter.check("global"));
        assert!(!limiter.check("global"));
    }

    #[test]
    fn keys_are_counted_separately() {
        let (limiter, _) = limiter(1);
        assert!(limiter.check("a"));
        assert!(limiter.check("b"));
        assert!(!limiter.check("a"));
    }
}
