use super::FetchStrategy;
use async_trait::async_trait;
use flagbench_cache::CacheClient;
use flagbench_core::{Error, FetchReport, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Bounds a whole invocation by `deadline`
///
/// When the deadline passes the inner fetch is dropped, which aborts any
/// tasks it spawned, and the caller gets [`Error::Timeout`] instead of a
/// partial report.
#[derive(Debug, Clone)]
pub struct WithDeadline<S> {
    inner: S,
    deadline: Duration,
}

impl<S: FetchStrategy> WithDeadline<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[async_trait]
impl<S: FetchStrategy> FetchStrategy for WithDeadline<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch(&self, client: Arc<dyn CacheClient>, keys: &[String]) -> Result<FetchReport> {
        match tokio::time::timeout(self.deadline, self.inner.fetch(client, keys)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    strategy = self.inner.name(),
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Fetch deadline elapsed"
                );
                Err(Error::timeout(
                    format!("{} fetch", self.inner.name()),
                    self.deadline,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{BoundedFanOut, Sequential};
    use flagbench_cache::MemoryCache;

    fn slow_cache(keys: &[String]) -> Arc<MemoryCache> {
        let memory = MemoryCache::with_latency(Duration::from_millis(100));
        for key in keys {
            memory.insert(key.clone(), "1");
        }
        Arc::new(memory)
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses() {
        let keys: Vec<String> = (0..5).map(|i| format!("k{i}")).collect();
        let strategy = WithDeadline::new(Sequential, Duration::from_millis(250));

        let err = strategy.fetch(slow_cache(&keys), &keys).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_within_deadline() {
        let keys: Vec<String> = (0..5).map(|i| format!("k{i}")).collect();
        let strategy = WithDeadline::new(
            BoundedFanOut::new(5).unwrap(),
            Duration::from_millis(250),
        );

        let report = strategy.fetch(slow_cache(&keys), &keys).await.unwrap();
        assert_eq!(report.len(), 5);
        assert_eq!(strategy.name(), "bounded");
    }
}
