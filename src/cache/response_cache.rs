use crate::prompt::SeedTitles;
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// A raw model answer and the time it was stored.
#[derive(Debug, Clone)]
struct CachedResponse {
    text: String,
    stored_at: DateTime<Utc>,
}

/// Thread-safe, time-bounded LRU cache of raw model answers
///
/// Keyed by the exact ordered triple of seed titles. Entries older than the
/// configured TTL are treated as absent and evicted on lookup.
pub struct ResponseCache {
    cache: Mutex<LruCache<SeedTitles, CachedResponse>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new response cache
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of answers to keep (clamped to at least 1)
    /// * `ttl_secs` - Freshness window for each entry
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        let ttl = Duration::seconds(ttl_secs.min(i64::MAX as u64 / 1000) as i64);

        Self {
            cache: Mutex::new(LruCache::new(cap)),
            ttl,
        }
    }

    /// Get a fresh cached answer for these titles
    pub fn get(&self, titles: &SeedTitles) -> Option<String> {
        self.get_at(titles, Utc::now())
    }

    /// Get a cached answer as seen at time `now`
    pub fn get_at(&self, titles: &SeedTitles, now: DateTime<Utc>) -> Option<String> {
        let mut cache = self.cache.lock().unwrap();
        let stale = match cache.get(titles) {
            Some(entry) if now - entry.stored_at < self.ttl => return Some(entry.text.clone()),
            Some(_) => true,
            None => false,
        };
        if stale {
            log::debug!("Evicting stale cache entry for {}", titles);
            cache.pop(titles);
        }
        None
    }

    /// Store an answer, stamped with the current time
    pub fn put(&self, titles: SeedTitles, text: String) {
        self.put_at(titles, text, Utc::now());
    }

    /// Store an answer stamped with `stored_at`
    pub fn put_at(&self, titles: SeedTitles, text: String, stored_at: DateTime<Utc>) {
        self.cache
            .lock()
            .unwrap()
            .put(titles, CachedResponse { text, stored_at });
    }

    /// Drop the entry for these titles, if any
    pub fn remove(&self, titles: &SeedTitles) -> bool {
        self.cache.lock().unwrap().pop(titles).is_some()
    }

    /// Get the current number of cached entries (fresh or not yet evicted)
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().unwrap().is_empty()
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        self.cache.lock().unwrap().clear();
    }
}
