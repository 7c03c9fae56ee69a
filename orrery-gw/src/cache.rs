//! Freshness cache
//!
//! Process-wide map from resource name to its fully-materialized collection,
//! with a fixed time-to-live. Expiry is checked lazily on read; an expired
//! entry and a never-populated key are the same miss. Entries are replaced
//! wholesale on population, never partially mutated.
//!
//! Time comes from an injected [`Clock`] so TTL expiry is deterministic in
//! tests.

use orrery_common::api::Record;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Time source for the cache
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    collection: Vec<Record>,
    expires_at: Instant,
}

/// TTL cache for materialized collections
pub struct FreshnessCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl FreshnessCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Cache with the production clock
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Return the cached collection for `key` if present and fresh
    pub async fn get(&self, key: &str) -> Option<Vec<Record>> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if self.clock.now() >= entry.expires_at {
            // Lazy expiry: the stale entry stays until the next put replaces it
            return None;
        }
        Some(entry.collection.clone())
    }

    /// Store `collection` under `key`, valid for `ttl` from now
    pub async fn put(&self, key: &str, collection: Vec<Record>, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                collection,
                expires_at,
            },
        );
    }
}
