//! Generic memoizing request cache
//!
//! Keyed single-flight cache for fallible async loads:
//! - Concurrent callers with the same key share one in-flight load
//! - Completed outcomes (success or failure) stay memoized until evicted
//! - Eviction forgets the entry without cancelling a load in flight
//!
//! The map lock is only held for entry bookkeeping, never across awaits;
//! per-key coordination happens on the entry's own cell.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

/// Shared outcome of a cached load
pub type LoadOutcome<T, E> = Result<Arc<T>, Arc<E>>;

type Cell<T, E> = Arc<OnceCell<LoadOutcome<T, E>>>;

/// Keyed memoizing cache for fallible async loads
pub struct RequestCache<K, T, E> {
    entries: Mutex<HashMap<K, Cell<T, E>>>,
}

impl<K, T, E> RequestCache<K, T, E>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the memoized outcome for `key`, running `load` when absent
    ///
    /// At most one load runs per key; every caller waiting on that key
    /// receives a clone of the same outcome. If the running caller is
    /// dropped mid-load, one of the remaining waiters takes over.
    pub async fn get_or_load<F, Fut>(&self, key: K, load: F) -> LoadOutcome<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = {
            let mut entries = self.entries.lock();
            entries.entry(key).or_default().clone()
        };

        cell.get_or_init(|| async move {
            match load().await {
                Ok(value) => Ok(Arc::new(value)),
                Err(err) => Err(Arc::new(err)),
            }
        })
        .await
        .clone()
    }

    /// Look up a completed outcome without triggering a load
    pub fn get(&self, key: &K) -> Option<LoadOutcome<T, E>> {
        let entries = self.entries.lock();
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drop the entry for `key`; the next load of it starts fresh
    pub fn evict(&self, key: &K) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of entries, pending loads included
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl<K, T, E> Default for RequestCache<K, T, E>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
