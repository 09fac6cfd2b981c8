//! Core cache client trait definition

use async_trait::async_trait;
use flagbench_core::{BatchReply, Result, SetEntry};
use std::sync::Arc;

/// Point and pipelined access to a key-value cache
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// Read one key; `Ok(None)` when nothing is stored
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Read many keys in one round trip
    ///
    /// On success the reply holds exactly one slot per key, in key order.
    async fn batch_get(&self, keys: &[String]) -> Result<Vec<BatchReply>>;

    /// Write many entries in one round trip
    async fn batch_set(&self, entries: &[SetEntry]) -> Result<()>;
}

#[async_trait]
impl<T: CacheClient + ?Sized> CacheClient for Arc<T> {
    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn batch_get(&self, keys: &[String]) -> Result<Vec<BatchReply>> {
        (**self).batch_get(keys).await
    }

    async fn batch_set(&self, entries: &[SetEntry]) -> Result<()> {
        (**self).batch_set(entries).await
    }
}

#[async_trait]
impl<T: CacheClient + ?Sized> CacheClient for Box<T> {
    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn batch_get(&self, keys: &[String]) -> Result<Vec<BatchReply>> {
        (**self).batch_get(keys).await
    }

    async fn batch_set(&self, entries: &[SetEntry]) -> Result<()> {
        (**self).batch_set(entries).await
    }
}
