//! Time-boxed in-memory caching for store-backed datasets.
//!
//! Every dataset the engine reads (sizing rules, property rules, category
//! lists, suggestion rankings) is cached in memory and refreshed only when
//! its TTL lapses. Entries are owned by the engine instance — there is no
//! process-global state — and the clock is injected so tests can move time
//! instead of sleeping.
//!
//! The slot mutex is held across the refresh fetch. Under the tokio
//! multi-thread runtime that is what preserves the at-most-one-fetch-in-
//! flight behavior the single-threaded original got for free; concurrent
//! callers of the same dataset queue on the lock and observe the value the
//! first one fetched.
//!
//! A failed refresh returns the dataset's default value for that call and
//! leaves any warm entry untouched, stale stamp included, so the next call
//! retries the fetch.

use lru::LruCache;
use std::fmt::Display;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Injectable time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stamp: Instant,
}

impl<T> Entry<T> {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.stamp) < ttl
    }
}

/// A single-value TTL cache slot.
pub struct TtlCell<T> {
    name: &'static str,
    ttl: Duration,
    slot: Mutex<Option<Entry<T>>>,
}

impl<T> TtlCell<T>
where
    T: Clone + Default,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached value while fresh; otherwise run `fetch` and store
    /// the result with a new stamp. On fetch failure the call yields
    /// `T::default()` and the slot is left exactly as it was.
    pub async fn get_or_refresh<F, Fut, E>(&self, clock: &dyn Clock, fetch: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut slot = self.slot.lock().await;
        let now = clock.now();

        if let Some(entry) = slot.as_ref()
            && entry.is_fresh(now, self.ttl)
        {
            tracing::debug!("cache hit for {}", self.name);
            return entry.value.clone();
        }

        match fetch().await {
            Ok(value) => {
                tracing::debug!("refreshed {} cache", self.name);
                *slot = Some(Entry {
                    value: value.clone(),
                    stamp: now,
                });
                value
            }
            Err(e) => {
                tracing::warn!("refresh failed for {}: {}, serving default", self.name, e);
                T::default()
            }
        }
    }

    /// Drop the cached entry.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

/// A keyed TTL cache for datasets whose results vary per query, bounded by
/// an LRU so long-lived processes don't accumulate one entry per distinct
/// key forever.
pub struct TtlMap<V> {
    name: &'static str,
    ttl: Duration,
    map: Mutex<LruCache<String, Entry<V>>>,
}

impl<V> TtlMap<V>
where
    V: Clone + Default,
{
    pub fn new(name: &'static str, ttl: Duration, capacity: NonZeroUsize) -> Self {
        Self {
            name,
            ttl,
            map: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Keyed variant of [`TtlCell::get_or_refresh`], with the same
    /// failed-refresh semantics per key.
    pub async fn get_or_refresh<F, Fut, E>(&self, clock: &dyn Clock, key: &str, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        let mut map = self.map.lock().await;
        let now = clock.now();

        if let Some(entry) = map.get(key)
            && entry.is_fresh(now, self.ttl)
        {
            tracing::debug!("cache hit for {} key {:?}", self.name, key);
            return entry.value.clone();
        }

        match fetch().await {
            Ok(value) => {
                tracing::debug!("refreshed {} cache for key {:?}", self.name, key);
                map.put(
                    key.to_owned(),
                    Entry {
                        value: value.clone(),
                        stamp: now,
                    },
                );
                value
            }
            Err(e) => {
                tracing::warn!(
                    "refresh failed for {} key {:?}: {}, serving default",
                    self.name,
                    key,
                    e
                );
                V::default()
            }
        }
    }

    /// Drop every cached entry.
    pub async fn invalidate(&self) {
        self.map.lock().await.clear();
    }
}
