use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info};
use crate::clock::Clock;
use crate::completion::CompletionError;
use crate::metrics::CACHE_SIZE;

pub type Outcome = Result<String, CompletionError>;

// What gets memoized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    // only generated code, failures are retried on the next request
    SuccessOnly,
    // failures too, until the TTL runs out
    Everything,
}

// Cache entry with timestamp
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub outcome: Outcome,
    pub inserted_at: Instant,
}

// Create a cache key (hash of the exact question text, no normalization)
pub fn make_cache_key(question: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(question.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-memory TTL cache of generation outcomes keyed by question.
///
/// Entries expire `ttl` after insertion. Expired entries are treated as absent by
/// [`CompletionCache::get`] and physically removed either there or by [`cache_sweeper`].
pub struct CompletionCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
}

impl CompletionCache {
    pub fn new(ttl: Duration, policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    fn is_live(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }

    // live outcome for the key, if any
    pub fn get(&self, key: &str) -> Option<Outcome> {
        let now = self.clock.now();

        // the shard guard must be gone before remove_if touches the same shard
        let expired = match self.entries.get(key) {
            Some(entry) if self.is_live(&entry, now) => return Some(entry.outcome.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(key = %&key[..8.min(key.len())], "cache entry expired, removing");
            self.entries.remove_if(key, |_, entry| !self.is_live(entry, now));
            CACHE_SIZE.set(self.entries.len() as f64);
        }
        None
    }

    // stores the outcome if the policy allows it, returns whether it was stored
    pub fn store(&self, key: String, outcome: &Outcome) -> bool {
        if outcome.is_err() && self.policy == CachePolicy::SuccessOnly {
            return false;
        }

        self.entries.insert(key, CacheEntry {
            outcome: outcome.clone(),
            inserted_at: self.clock.now(),
        });
        CACHE_SIZE.set(self.entries.len() as f64);
        true
    }

    // drops every expired entry, returns how many went away
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_live(entry, now));
        let after = self.entries.len();
        CACHE_SIZE.set(after as f64);
        before.saturating_sub(after)
    }

    // entries currently held, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// Sweeper - runs every `every` and drops expired entries

pub async fn cache_sweeper(cache: Arc<CompletionCache>, every: Duration) {
    let mut interval = interval(every);

    info!(interval = ?every, "cache sweeper started");

    loop {
        interval.tick().await;

        let purged = cache.purge_expired();
        if purged > 0 {
            info!(purged, remaining = cache.len(), "expired cache entries removed");
        }
    }
}
