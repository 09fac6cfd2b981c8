use super::{fetch_one, FetchStrategy};
use crate::aggregate::Aggregator;
use async_trait::async_trait;
use flagbench_cache::CacheClient;
use flagbench_core::{FetchReport, Result};
use std::sync::Arc;

/// One point read per key, in key order, never more than one in flight
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

#[async_trait]
impl FetchStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    async fn fetch(&self, client: Arc<dyn CacheClient>, keys: &[String]) -> Result<FetchReport> {
        let mut aggregator = Aggregator::new(keys.len());
        for key in keys {
            let outcome = fetch_one(client.as_ref(), key).await;
            aggregator.record(key.clone(), outcome);
        }
        Ok(aggregator.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagbench_cache::{InstrumentedCache, MemoryCache};

    #[tokio::test]
    async fn test_one_request_per_key() {
        let memory = MemoryCache::new();
        memory.insert("a", "1");
        memory.insert("b", "0");
        let cache = Arc::new(InstrumentedCache::new(memory));
        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let report = Sequential.fetch(cache.clone(), &keys).await.unwrap();

        assert_eq!(report.get("a"), Some(true));
        assert_eq!(report.get("b"), Some(false));
        assert_eq!(report.failed, 1);
        let calls = cache.snapshot();
        assert_eq!(calls.gets, 3);
        assert_eq!(calls.peak_in_flight, 1);
    }
}
