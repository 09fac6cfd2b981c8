//! Call accounting and fault injection around any cache client

use crate::traits::CacheClient;
use async_trait::async_trait;
use flagbench_core::{BatchReply, Error, Result, SetEntry};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Counters captured at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallSnapshot {
    pub pings: usize,
    pub gets: usize,
    pub batch_gets: usize,
    pub batch_sets: usize,
    /// Highest number of requests observed in flight at once
    pub peak_in_flight: usize,
}

impl CallSnapshot {
    /// Requests of any kind
    pub fn requests(&self) -> usize {
        self.pings + self.gets + self.batch_gets + self.batch_sets
    }
}

#[derive(Debug, Default)]
struct CallStats {
    pings: AtomicUsize,
    gets: AtomicUsize,
    batch_gets: AtomicUsize,
    batch_sets: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

#[derive(Debug, Default)]
struct Faults {
    batch_get: AtomicBool,
    batch_set: AtomicBool,
    failing_keys: RwLock<HashSet<String>>,
    panicking_keys: RwLock<HashSet<String>>,
}

/// Decrements the in-flight gauge when the request finishes or unwinds
struct InFlight<'a> {
    stats: &'a CallStats,
}

impl<'a> InFlight<'a> {
    fn enter(stats: &'a CallStats, counter: &AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        let current = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        stats.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        Self { stats }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wraps a client, counting every request and the peak concurrency
pub struct InstrumentedCache<C> {
    inner: C,
    stats: CallStats,
    faults: Faults,
}

impl<C: CacheClient> InstrumentedCache<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            stats: CallStats::default(),
            faults: Faults::default(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn snapshot(&self) -> CallSnapshot {
        CallSnapshot {
            pings: self.stats.pings.load(Ordering::Relaxed),
            gets: self.stats.gets.load(Ordering::Relaxed),
            batch_gets: self.stats.batch_gets.load(Ordering::Relaxed),
            batch_sets: self.stats.batch_sets.load(Ordering::Relaxed),
            peak_in_flight: self.stats.peak_in_flight.load(Ordering::SeqCst),
        }
    }

    /// Zero all counters; injected faults stay in place
    pub fn reset(&self) {
        self.stats.pings.store(0, Ordering::Relaxed);
        self.stats.gets.store(0, Ordering::Relaxed);
        self.stats.batch_gets.store(0, Ordering::Relaxed);
        self.stats.batch_sets.store(0, Ordering::Relaxed);
        self.stats.peak_in_flight.store(0, Ordering::SeqCst);
    }

    /// Make every `batch_get` fail
    pub fn fail_batch_get(&self, fail: bool) {
        self.faults.batch_get.store(fail, Ordering::SeqCst);
    }

    /// Make every `batch_set` fail
    pub fn fail_batch_set(&self, fail: bool) {
        self.faults.batch_set.store(fail, Ordering::SeqCst);
    }

    /// Make `get` return a client error for `key`
    pub fn fail_key(&self, key: impl Into<String>) {
        self.faults.failing_keys.write().insert(key.into());
    }

    /// Make `get` panic for `key`
    pub fn panic_on_key(&self, key: impl Into<String>) {
        self.faults.panicking_keys.write().insert(key.into());
    }
}

#[async_trait]
impl<C: CacheClient> CacheClient for InstrumentedCache<C> {
    async fn ping(&self) -> Result<()> {
        let _guard = InFlight::enter(&self.stats, &self.stats.pings);
        self.inner.ping().await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = InFlight::enter(&self.stats, &self.stats.gets);
        if self.faults.panicking_keys.read().contains(key) {
            panic!("injected panic for key '{key}'");
        }
        let result = self.inner.get(key).await;
        if self.faults.failing_keys.read().contains(key) {
            return Err(Error::client("GET", format!("injected failure for key '{key}'")));
        }
        result
    }

    async fn batch_get(&self, keys: &[String]) -> Result<Vec<BatchReply>> {
        let _guard = InFlight::enter(&self.stats, &self.stats.batch_gets);
        if self.faults.batch_get.load(Ordering::SeqCst) {
            return Err(Error::batch_read(keys.len(), "injected pipeline failure"));
        }
        let mut replies = self.inner.batch_get(keys).await?;
        let failing = self.faults.failing_keys.read();
        for (key, reply) in keys.iter().zip(replies.iter_mut()) {
            if failing.contains(key) {
                *reply = BatchReply::Error(format!("injected failure for key '{key}'"));
            }
        }
        Ok(replies)
    }

    async fn batch_set(&self, entries: &[SetEntry]) -> Result<()> {
        let _guard = InFlight::enter(&self.stats, &self.stats.batch_sets);
        if self.faults.batch_set.load(Ordering::SeqCst) {
            return Err(Error::batch_write(entries.len(), "injected pipeline failure"));
        }
        self.inner.batch_set(entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCache;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_counts_calls() {
        let cache = InstrumentedCache::new(MemoryCache::new());
        cache.ping().await.unwrap();
        cache.get("a").await.unwrap();
        cache.get("b").await.unwrap();
        cache.batch_get(&["a".to_string()]).await.unwrap();

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.pings, 1);
        assert_eq!(snapshot.gets, 2);
        assert_eq!(snapshot.batch_gets, 1);
        assert_eq!(snapshot.requests(), 4);
        assert_eq!(snapshot.peak_in_flight, 1);

        cache.reset();
        assert_eq!(cache.snapshot(), CallSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracks_peak_concurrency() {
        let cache = Arc::new(InstrumentedCache::new(MemoryCache::with_latency(
            Duration::from_millis(5),
        )));
        let calls: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    let key = format!("k{i}");
                    cache.get(&key).await
                })
            })
            .collect();
        for call in calls {
            call.await.unwrap().unwrap();
        }
        assert_eq!(cache.snapshot().peak_in_flight, 4);
    }

    #[tokio::test]
    async fn test_injected_faults() {
        let memory = MemoryCache::new();
        memory.insert("a", "1");
        memory.insert("b", "1");
        let cache = InstrumentedCache::new(memory);
        cache.fail_key("b");

        assert!(cache.get("a").await.is_ok());
        assert!(matches!(cache.get("b").await, Err(Error::Client { .. })));

        let keys = vec!["a".to_string(), "b".to_string()];
        let replies = cache.batch_get(&keys).await.unwrap();
        assert_eq!(replies[0], BatchReply::Value("1".to_string()));
        assert!(matches!(replies[1], BatchReply::Error(_)));

        cache.fail_batch_get(true);
        assert!(matches!(
            cache.batch_get(&keys).await,
            Err(Error::BatchRead { keys: 2, .. })
        ));

        cache.fail_batch_set(true);
        assert!(matches!(
            cache.batch_set(&[]).await,
            Err(Error::BatchWrite { .. })
        ));
    }
}
