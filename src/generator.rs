use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use crate::cache::{CompletionCache, Outcome, make_cache_key};
use crate::completion::CompletionClient;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, UPSTREAM_ERRORS};
use crate::models::ChatMessage;
use crate::prompt::{SYSTEM_PROMPT, build_prompt};

/// Completion client fronted by the question cache.
///
/// Concurrent misses for the same question collapse into a single upstream call:
/// the first caller takes the per-key lock, the rest wait and then read the cache.
pub struct CachedCompletionClient {
    client: Arc<dyn CompletionClient>,
    cache: Arc<CompletionCache>,
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl CachedCompletionClient {
    pub fn new(client: Arc<dyn CompletionClient>, cache: Arc<CompletionCache>) -> Self {
        Self {
            client,
            cache,
            inflight: DashMap::new(),
        }
    }

    pub async fn get_or_generate(&self, question: &str) -> Outcome {
        let key = make_cache_key(question);

        // check cache first
        if let Some(outcome) = self.cache.get(&key) {
            CACHE_HITS.inc();
            info!("cache HIT");
            return outcome;
        }

        let slot = InflightSlot::join(&self.inflight, &key);
        let guard = slot.lock.lock().await;

        // someone else may have filled it while we waited
        let outcome = match self.cache.get(&key) {
            Some(outcome) => {
                CACHE_HITS.inc();
                info!("cache HIT after waiting on in-flight request");
                outcome
            }
            None => {
                CACHE_MISSES.inc();
                info!("cache MISS - calling completion API");
                let outcome = self.generate(question).await;
                self.cache.store(key.clone(), &outcome);
                outcome
            }
        };

        drop(guard);
        drop(slot);

        outcome
    }

    async fn generate(&self, question: &str) -> Outcome {
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(question)),
        ];

        match self.client.complete(&messages).await {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) => {
                UPSTREAM_ERRORS.inc();
                warn!(error = %e, "code generation failed");
                Err(e)
            }
        }
    }
}

// One caller's share of a per-key lock. Dropping it, on completion or when the
// request future is cancelled, removes the key once no other caller holds it.
struct InflightSlot<'a> {
    map: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> InflightSlot<'a> {
    fn join(map: &'a DashMap<String, Arc<Mutex<()>>>, key: &'a str) -> Self {
        let lock = Arc::clone(map.entry(key.to_string()).or_default().value());
        Self { map, key, lock }
    }
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        let lock = std::mem::take(&mut self.lock);
        // our reference goes away under the shard lock, so concurrent drops cannot both skip
        if let Entry::Occupied(entry) = self.map.entry(self.key.to_string()) {
            drop(lock);
            if Arc::strong_count(entry.get()) == 1 {
                entry.remove();
            }
        }
    }
}
