use super::{decode, FetchStrategy};
use crate::aggregate::Aggregator;
use async_trait::async_trait;
use flagbench_cache::CacheClient;
use flagbench_core::{BatchReply, Error, FetchReport, KeyFailure, Result};
use std::sync::Arc;
use tracing::error;

/// All keys in one pipelined request
///
/// If the pipeline itself fails the whole invocation fails with
/// [`Error::BatchRead`]; otherwise each reply slot is matched to the key at
/// the same position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipelined;

#[async_trait]
impl FetchStrategy for Pipelined {
    fn name(&self) -> &'static str {
        "pipelined"
    }

    async fn fetch(&self, client: Arc<dyn CacheClient>, keys: &[String]) -> Result<FetchReport> {
        if keys.is_empty() {
            return Ok(FetchReport::default());
        }

        let replies = client.batch_get(keys).await.map_err(|e| {
            error!(error = %e, keys = keys.len(), "Pipelined read failed");
            match e {
                Error::BatchRead { .. } => e,
                other => Error::batch_read(keys.len(), other.to_string()),
            }
        })?;

        let mut aggregator = Aggregator::new(keys.len());
        let mut replies = replies.into_iter();
        for key in keys {
            let outcome = match replies.next() {
                Some(BatchReply::Value(raw)) => decode(raw),
                Some(BatchReply::Missing) => Err(KeyFailure::Missing),
                Some(BatchReply::Error(message)) => Err(KeyFailure::Client(message)),
                None => Err(KeyFailure::Client("no reply slot".to_string())),
            };
            aggregator.record(key.clone(), outcome);
        }
        Ok(aggregator.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flagbench_cache::{InstrumentedCache, MemoryCache};
    use flagbench_core::SetEntry;

    /// Replies with fewer slots than keys
    struct ShortReplies;

    #[async_trait]
    impl CacheClient for ShortReplies {
        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(Some("1".to_string()))
        }

        async fn batch_get(&self, _keys: &[String]) -> Result<Vec<BatchReply>> {
            Ok(vec![BatchReply::Value("1".to_string())])
        }

        async fn batch_set(&self, _entries: &[SetEntry]) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_single_round_trip() {
        let memory = MemoryCache::new();
        memory.insert("a", "1");
        memory.insert("b", "True");
        let cache = Arc::new(InstrumentedCache::new(memory));
        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let report = Pipelined.fetch(cache.clone(), &keys).await.unwrap();

        assert_eq!(report.get("a"), Some(true));
        assert_eq!(report.get("b"), Some(true));
        assert_eq!(report.failed, 1);
        assert_eq!(cache.snapshot().batch_gets, 1);
        assert_eq!(cache.snapshot().gets, 0);
    }

    #[tokio::test]
    async fn test_slot_errors_are_per_key() {
        let memory = MemoryCache::new();
        memory.insert("a", "1");
        memory.insert("b", "1");
        let cache = Arc::new(InstrumentedCache::new(memory));
        cache.fail_key("b");
        let keys = vec!["a".to_string(), "b".to_string()];

        let report = Pipelined.fetch(cache, &keys).await.unwrap();
        assert_eq!(report.get("a"), Some(true));
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_missing_slots_are_failures() {
        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let report = Pipelined.fetch(Arc::new(ShortReplies), &keys).await.unwrap();

        assert_eq!(report.get("a"), Some(true));
        assert_eq!(report.failed, 2);
    }

    #[tokio::test]
    async fn test_batch_failure_aborts() {
        let cache = Arc::new(InstrumentedCache::new(MemoryCache::new()));
        cache.fail_batch_get(true);
        let keys = vec!["a".to_string()];

        let err = Pipelined.fetch(cache, &keys).await.unwrap_err();
        assert!(matches!(err, Error::BatchRead { keys: 1, .. }));
    }
}
