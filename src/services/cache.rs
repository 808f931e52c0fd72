// src/services/cache.rs
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Time-boxed snapshot cache. Owned by whoever builds it; there is no global instance.
///
/// Concurrent misses on the same key share one fill: the first caller runs
/// it while the others wait and then read what it stored.
#[derive(Debug)]
pub struct SnapshotCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    fill_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<V: Clone> Default for SnapshotCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> SnapshotCache<V> {
    pub fn new() -> Self {
        SnapshotCache {
            entries: RwLock::new(HashMap::new()),
            fill_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the fresh value under `key`, or runs `fill` once for all
    /// callers missing at the same time and stores its result. A failed fill
    /// stores nothing; the next waiter runs its own fill.
    pub async fn get_or_try_fill<F, Fut, E>(&self, key: &str, ttl: Duration, fill: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key, ttl).await {
            return Ok(value);
        }

        let lock = self.fill_lock(key).await;
        let _guard = lock.lock().await;

        // Filled by whoever held the lock before us.
        if let Some(value) = self.get(key, ttl).await {
            return Ok(value);
        }

        let value = fill().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    async fn fill_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.fill_locks.lock().await;
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Returns the value stored under `key` if it is no older than `ttl`.
    pub async fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        self.get_as_of(key, ttl, Utc::now()).await
    }

    pub async fn get_as_of(&self, key: &str, ttl: Duration, now: DateTime<Utc>) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        // Entries stamped in the future count as fresh.
        let fresh = (now - entry.stored_at)
            .to_std()
            .map(|age| age <= ttl)
            .unwrap_or(true);

        if fresh {
            debug!("Cache hit for {}", key);
            Some(entry.value.clone())
        } else {
            debug!("Cache entry for {} is stale (stored at {})", key, entry.stored_at);
            None
        }
    }

    pub async fn insert(&self, key: &str, value: V) {
        self.insert_at(key, value, Utc::now()).await
    }

    pub async fn insert_at(&self, key: &str, value: V, stored_at: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry { value, stored_at });
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}
