use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

mod macros;

/// Cache bucket keys for remote catalog responses
///
/// Discovery responses are keyed by genre id and sort criterion, so a
/// different sort would occupy a different bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Discover(u64),
    Search(String),
    Trending,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Discover(genre_id) => write!(f, "discover:{}:popularity.desc", genre_id),
            CacheKey::Search(query) => write!(f, "search:{}", query.to_lowercase()),
            CacheKey::Trending => write!(f, "trending:day"),
        }
    }
}

struct Entry {
    json: String,
    expires_at: Instant,
}

/// In-process TTL cache for catalog responses
///
/// An explicit key → (value, expiry) store. Values round-trip through
/// serde_json, so cached and freshly-fetched results take the same
/// deserialization path. Expiry is checked on read; expired entries are
/// swept on write.
#[derive(Clone)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Retrieves a live value from the cache by key
    ///
    /// Returns None on a miss, on an expired entry, or if the stored
    /// payload no longer deserializes into `T`.
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let name = key.to_string();
        let entries = self.entries.read().await;
        let entry = entries.get(&name)?;

        if entry.expires_at <= Instant::now() {
            return None;
        }

        match serde_json::from_str(&entry.json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(key = %name, error = %e, "Cache deserialization error");
                None
            }
        }
    }

    /// Stores a value in the cache with the given time-to-live
    pub async fn insert<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization error");
                return;
            }
        };

        let now = Instant::now();
        let mut entries = self.entries.write().await;

        // Search keys are unbounded; sweep dead entries while we hold the
        // write lock anyway.
        entries.retain(|_, entry| entry.expires_at > now);

        entries.insert(
            key.to_string(),
            Entry {
                json,
                expires_at: now + ttl,
            },
        );
    }

    /// Acquires the per-key fetch lock
    ///
    /// Concurrent misses for the same key serialize on this lock; whoever
    /// wins fills the cache and the rest re-check before fetching, so a
    /// key sees at most one upstream call per TTL window.
    pub async fn key_lock(&self, key: &CacheKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
