//! In-process cache backend
//!
//! Behaves like a single cache node: entries expire after their TTL, and an
//! optional fixed latency is charged once per request (a pipelined request
//! pays it once for the whole batch).

use crate::traits::CacheClient;
use async_trait::async_trait;
use dashmap::DashMap;
use flagbench_core::{BatchReply, Result, SetEntry};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// DashMap-backed cache with per-entry expiry
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, StoredValue>,
    latency: Duration,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge `latency` on every request, simulating a network round trip
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            latency,
        }
    }

    /// Store a raw value without expiry
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(
            key.into(),
            StoredValue {
                value: value.into(),
                expires_at: None,
            },
        );
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of stored entries, including ones that expired but were not read since
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn read(&self, key: &str, now: Instant) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }
        // Read guard is released above; removing under it would deadlock the shard
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn ping(&self) -> Result<()> {
        self.round_trip().await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.round_trip().await;
        Ok(self.read(key, Instant::now()))
    }

    async fn batch_get(&self, keys: &[String]) -> Result<Vec<BatchReply>> {
        self.round_trip().await;
        let now = Instant::now();
        Ok(keys
            .iter()
            .map(|key| match self.read(key, now) {
                Some(value) => BatchReply::Value(value),
                None => BatchReply::Missing,
            })
            .collect())
    }

    async fn batch_set(&self, entries: &[SetEntry]) -> Result<()> {
        self.round_trip().await;
        let now = Instant::now();
        for entry in entries {
            // Zero TTL means the entry never expires
            let expires_at = (!entry.ttl.is_zero()).then(|| now + entry.ttl);
            self.entries.insert(
                entry.key.clone(),
                StoredValue {
                    value: entry.value.clone(),
                    expires_at,
                },
            );
        }
        Ok(())
    }
}
