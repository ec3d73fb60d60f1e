// src/cache.rs
//! Time-bounded memo of the last successful fetch per source.
//!
//! Policy: serve fresh from cache; on a miss, fetch and store; on a failed
//! fetch, serve the last known entry regardless of age (stale beats nothing);
//! only a key with no history ever yields an empty list. Errors never cross
//! this boundary.
//!
//! Concurrency: at most one outbound fetch per key. Callers arriving while a
//! fetch is in flight wait for its result rather than reading around it, so
//! everyone on the same key observes the same refresh.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use metrics::counter;

use crate::message::Message;
use crate::source::MessageSource;

pub(crate) struct CacheEntry {
    fetched_at: Instant,
    messages: Vec<Message>,
}

pub struct MessageCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    // Per-key fetch gates; the entry lock above is never held across an await.
    inflight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl MessageCache {
    pub fn new(ttl: Duration) -> Self {
        crate::metrics::ensure_described();
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn fresh_snapshot(&self, source_key: &str) -> Option<Vec<Message>> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries
            .get(source_key)
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.messages.clone())
    }

    fn any_snapshot(&self, source_key: &str) -> Option<Vec<Message>> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries.get(source_key).map(|e| e.messages.clone())
    }

    fn store(&self, source_key: &str, messages: Vec<Message>) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        // Last write wins; one entry per key.
        entries.insert(
            source_key.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                messages,
            },
        );
    }

    fn gate_for(&self, source_key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut inflight = self.inflight.lock().expect("cache lock poisoned");
        inflight
            .entry(source_key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Never fails outward: the result is fresh, stale, or empty, in that
    /// order of preference.
    pub async fn get_or_fetch(
        &self,
        source: &dyn MessageSource,
        source_key: &str,
    ) -> Vec<Message> {
        if let Some(messages) = self.fresh_snapshot(source_key) {
            counter!("relay_cache_hits_total").increment(1);
            return messages;
        }

        let gate = self.gate_for(source_key);
        let _fetching = gate.lock().await;

        // A waiter may find the entry refreshed by whoever held the gate.
        if let Some(messages) = self.fresh_snapshot(source_key) {
            counter!("relay_cache_hits_total").increment(1);
            return messages;
        }

        match source.fetch().await {
            Ok(messages) => {
                counter!("relay_cache_refresh_total").increment(1);
                self.store(source_key, messages.clone());
                messages
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    source = source.name(),
                    source_key,
                    "fetch failed; serving cached messages if any"
                );
                match self.any_snapshot(source_key) {
                    Some(stale) => {
                        counter!("relay_cache_stale_served_total").increment(1);
                        stale
                    }
                    None => Vec::new(),
                }
            }
        }
    }
}
