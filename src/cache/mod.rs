//! Freshness-windowed cache in front of the remote fetch collaborator.
//!
//! Each key maps to a slot that is either `Pending` (a load is in flight and can be joined) or
//! `Ready` (a payload and the instant it was fetched). Concurrent callers for a key that is
//! pending share the single outstanding load instead of issuing their own.
//!
//! Ready entries older than [`CACHE_TTL`] are treated as absent and replaced on the next load;
//! nothing is evicted eagerly. A failed load is never cached: the slot is cleared and the error
//! goes to every caller that joined that load.

use chrono::{DateTime, TimeDelta, Utc};
use core::fmt::{Debug, Formatter, Result as FmtResult};
use core::sync::atomic::{AtomicU64, Ordering};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::transport::TransportError;

/// Log target for the cache
const LOG_TARGET: &str = "cache";

/// How long a fetched payload stays fresh.
pub const CACHE_TTL: TimeDelta = TimeDelta::minutes(10);

/// The cache used by the engine for raw API payloads, keyed by request URL.
pub type ApiCache = Cache<Value, TransportError>;

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// A payload together with the instant it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub payload: V,
    pub fetched_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// Returns `true` while `now - fetched_at < CACHE_TTL`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) < CACHE_TTL
    }
}

type Load<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

enum Slot<V, E> {
    Pending { id: u64, load: Load<V, E> },
    Ready(CacheEntry<V>),
}

enum Lookup<V, E> {
    Hit(V),
    Join(u64, Load<V, E>),
    Miss,
}

/// A key/value cache with a fixed freshness window and at most one in-flight load per key.
pub struct Cache<V, E> {
    slots: Mutex<HashMap<String, Slot<V, E>>>,
    next_load_id: AtomicU64,
    clock: Clock,
}

impl<V, E> Cache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            next_load_id: AtomicU64::new(0),
            clock,
        }
    }

    /// Return the cached payload for `key`, or run `loader` to produce it.
    ///
    /// `loader` is only invoked when there is neither a fresh entry nor an in-flight load for
    /// `key`. If a load is already in flight, this call waits for it and returns its outcome.
    pub async fn fetch_cached<F, Fut>(&self, key: &str, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let (id, load) = match self.lookup(key) {
            Lookup::Hit(payload) => {
                log::debug!(target: LOG_TARGET, "hit: {key}");
                return Ok(payload);
            }
            Lookup::Join(id, load) => {
                log::debug!(target: LOG_TARGET, "joining in-flight load: {key}");
                (id, load)
            }
            Lookup::Miss => self.start_load(key, loader),
        };

        let outcome = load.await;
        self.settle(key, id, &outcome);
        outcome
    }

    /// Number of keys holding a fresh payload.
    #[must_use]
    pub fn fresh_len(&self) -> usize {
        let now = (self.clock)();
        let slots = self.slots.lock().expect("lock poisoned");
        slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(entry) if entry.is_fresh(now)))
            .count()
    }

    fn lookup(&self, key: &str) -> Lookup<V, E> {
        let now = (self.clock)();
        let slots = self.slots.lock().expect("lock poisoned");

        match slots.get(key) {
            Some(Slot::Ready(entry)) if entry.is_fresh(now) => Lookup::Hit(entry.payload.clone()),
            Some(Slot::Pending { id, load }) => Lookup::Join(*id, load.clone()),
            _ => Lookup::Miss,
        }
    }

    fn start_load<F, Fut>(&self, key: &str, loader: F) -> (u64, Load<V, E>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let mut slots = self.slots.lock().expect("lock poisoned");

        // Another caller may have started a load between our lookup and taking the lock.
        if let Some(Slot::Pending { id, load }) = slots.get(key) {
            return (*id, load.clone());
        }

        log::debug!(target: LOG_TARGET, "miss: {key}");

        let id = self.next_load_id.fetch_add(1, Ordering::Relaxed);
        let load = loader().boxed().shared();
        let _ = slots.insert(key.to_string(), Slot::Pending { id, load: load.clone() });
        (id, load)
    }

    /// Replace the pending slot for load `id` with its outcome; later loads are left alone.
    fn settle(&self, key: &str, id: u64, outcome: &Result<V, E>) {
        let mut slots = self.slots.lock().expect("lock poisoned");

        let still_pending = matches!(slots.get(key), Some(Slot::Pending { id: pending, .. }) if *pending == id);
        if !still_pending {
            return;
        }

        match outcome {
            Ok(payload) => {
                let entry = CacheEntry {
                    payload: payload.clone(),
                    fetched_at: (self.clock)(),
                };
                let _ = slots.insert(key.to_string(), Slot::Ready(entry));
            }
            Err(_) => {
                log::debug!(target: LOG_TARGET, "load failed, not caching: {key}");
                let _ = slots.remove(key);
            }
        }
    }
}

impl<V, E> Default for Cache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Debug for Cache<V, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let len = self.slots.lock().map_or(0, |slots| slots.len());
        f.debug_struct("Cache").field("slots", &len).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicI64, AtomicUsize};
    use core::time::Duration;

    type TestCache = Cache<String, String>;

    fn counting_loader(
        counter: &Arc<AtomicUsize>,
        result: Result<String, String>,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<String, String>> {
        let counter = Arc::clone(counter);
        move || {
            async move {
                let _ = counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                result
            }
            .boxed()
        }
    }

    fn manual_clock(start: i64) -> (Arc<AtomicI64>, Clock) {
        let seconds = Arc::new(AtomicI64::new(start));
        let handle = Arc::clone(&seconds);
        let clock: Clock = Arc::new(move || DateTime::from_timestamp(handle.load(Ordering::SeqCst), 0).unwrap_or_default());
        (seconds, clock)
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_load() {
        let cache = TestCache::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.fetch_cached("k", counting_loader(&counter, Ok("v".to_string()))),
            cache.fetch_cached("k", counting_loader(&counter, Ok("other".to_string()))),
        );

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap(), "v");
        assert_eq!(b.unwrap(), "v");
    }

    #[tokio::test]
    async fn test_distinct_keys_load_independently() {
        let cache = TestCache::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.fetch_cached("a", counting_loader(&counter, Ok("1".to_string()))),
            cache.fetch_cached("b", counting_loader(&counter, Ok("2".to_string()))),
        );

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(a.unwrap(), "1");
        assert_eq!(b.unwrap(), "2");
    }

    #[tokio::test]
    async fn test_fresh_entry_is_reused() {
        let cache = TestCache::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let first = cache.fetch_cached("k", counting_loader(&counter, Ok("v".to_string()))).await;
        let second = cache.fetch_cached("k", counting_loader(&counter, Ok("w".to_string()))).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(first.unwrap(), "v");
        assert_eq!(second.unwrap(), "v");
        assert_eq!(cache.fresh_len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_reloaded() {
        let (seconds, clock) = manual_clock(1_000_000);
        let cache = TestCache::with_clock(clock);
        let counter = Arc::new(AtomicUsize::new(0));

        let _ = cache.fetch_cached("k", counting_loader(&counter, Ok("old".to_string()))).await.unwrap();

        // Just inside the window.
        seconds.store(1_000_000 + 599, Ordering::SeqCst);
        assert_eq!(cache.fetch_cached("k", counting_loader(&counter, Ok("new".to_string()))).await.unwrap(), "old");

        // Exactly at the TTL the entry is no longer valid.
        seconds.store(1_000_000 + 600, Ordering::SeqCst);
        assert_eq!(cache.fresh_len(), 0);
        assert_eq!(cache.fetch_cached("k", counting_loader(&counter, Ok("new".to_string()))).await.unwrap(), "new");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_shared_and_not_cached() {
        let cache = TestCache::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.fetch_cached("k", counting_loader(&counter, Err("boom".to_string()))),
            cache.fetch_cached("k", counting_loader(&counter, Err("other".to_string()))),
        );

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap_err(), "boom");
        assert_eq!(b.unwrap_err(), "boom");
        assert_eq!(cache.fresh_len(), 0);

        let retry = cache.fetch_cached("k", counting_loader(&counter, Ok("v".to_string()))).await;
        assert_eq!(retry.unwrap(), "v");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_entry_freshness_boundary() {
        let fetched_at = DateTime::from_timestamp(0, 0).unwrap();
        let entry = CacheEntry { payload: (), fetched_at };
        assert!(entry.is_fresh(fetched_at));
        assert!(entry.is_fresh(fetched_at + TimeDelta::seconds(599)));
        assert!(!entry.is_fresh(fetched_at + CACHE_TTL));
    }
}
