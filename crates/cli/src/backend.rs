//! Choosing and connecting the cache backend

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use flagbench_cache::{CacheClient, InstrumentedCache, MemoryCache, RedisClusterCache};
use flagbench_config::ConfigLoader;
use flagbench_core::constants::DEFAULT_KEY_PREFIX;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Redis cluster configured from REDIS_CLUSTER_* variables
    Redis,
    /// In-process store, for trying strategies without a cluster
    Memory,
}

#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Where flags are stored
    #[arg(long, value_enum, default_value_t = Backend::Redis, global = true)]
    pub backend: Backend,

    /// Simulated round-trip latency for the memory backend
    #[arg(long, value_name = "MS", default_value_t = 0, global = true)]
    pub latency_ms: u64,

    /// Number of generated keys
    #[arg(long, value_name = "N", default_value_t = 100, global = true)]
    pub keys: usize,

    /// Prefix for generated keys
    #[arg(long, default_value = DEFAULT_KEY_PREFIX, global = true)]
    pub key_prefix: String,

    /// Use `prefix:0` .. `prefix:N-1` instead of random keys, so a later
    /// run can read back what an earlier one seeded
    #[arg(long, global = true)]
    pub sequential_keys: bool,
}

pub type SharedCache = Arc<InstrumentedCache<Box<dyn CacheClient>>>;

/// A connected backend with request counting
pub struct Session {
    pub cache: SharedCache,
    pub endpoint: String,
}

impl Session {
    pub fn client(&self) -> Arc<dyn CacheClient> {
        self.cache.clone()
    }
}

impl BackendArgs {
    pub async fn connect(&self) -> Result<Session> {
        let (client, endpoint): (Box<dyn CacheClient>, String) = match self.backend {
            Backend::Redis => {
                let config = ConfigLoader::new()
                    .load()
                    .context("failed to load cluster configuration")?;
                let cluster = RedisClusterCache::connect(&config).await?;
                let endpoint = cluster.endpoint().to_string();
                (Box::new(cluster), endpoint)
            }
            Backend::Memory => {
                let latency = Duration::from_millis(self.latency_ms);
                (
                    Box::new(MemoryCache::with_latency(latency)),
                    format!("memory (latency {}ms)", self.latency_ms),
                )
            }
        };

        info!(endpoint = %endpoint, "Connected to backend");
        Ok(Session {
            cache: Arc::new(InstrumentedCache::new(client)),
            endpoint,
        })
    }

    /// `prefix:uuid` keys unique to this run, or `prefix:N` with `--sequential-keys`
    pub fn generate_keys(&self) -> Vec<String> {
        if self.sequential_keys {
            (0..self.keys)
                .map(|i| format!("{}:{i}", self.key_prefix))
                .collect()
        } else {
            (0..self.keys)
                .map(|_| format!("{}:{}", self.key_prefix, Uuid::new_v4()))
                .collect()
        }
    }

    /// In-memory backend without latency, for command tests
    #[cfg(test)]
    pub(crate) fn memory(keys: usize) -> Self {
        Self {
            backend: Backend::Memory,
            latency_ms: 0,
            keys,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            sequential_keys: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_keys_are_unique_and_prefixed() {
        let keys = BackendArgs::memory(50).generate_keys();
        assert_eq!(keys.len(), 50);
        assert!(keys.iter().all(|key| key.starts_with("delivery:")));
        assert_eq!(keys.iter().collect::<HashSet<_>>().len(), 50);
    }

    #[test]
    fn test_sequential_keys_repeat_across_runs() {
        let args = BackendArgs {
            sequential_keys: true,
            ..BackendArgs::memory(3)
        };
        assert_eq!(args.generate_keys(), vec!["delivery:0", "delivery:1", "delivery:2"]);
        assert_eq!(args.generate_keys(), args.generate_keys());
    }

    #[tokio::test]
    async fn test_memory_backend_connects() {
        let session = BackendArgs::memory(0).connect().await.unwrap();
        session.client().ping().await.unwrap();
        assert_eq!(session.cache.snapshot().pings, 1);
        assert!(session.endpoint.starts_with("memory"));
    }
}
