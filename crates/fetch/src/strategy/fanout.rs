//! Concurrent strategies
//!
//! Producers run as spawned tasks and never touch the value map: successful
//! `(key, value)` pairs travel over a channel to a single collector, and
//! failures go straight to the aggregator's shared counter. The collector
//! stops when every producer has finished and dropped its sender.

use super::{fetch_one, FetchStrategy};
use crate::aggregate::{Aggregator, FailureCounter};
use async_trait::async_trait;
use crossbeam::queue::SegQueue;
use flagbench_cache::CacheClient;
use flagbench_core::{constants::DEFAULT_CONCURRENCY, Error, FetchReport, KeyFailure, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, Instrument};

const RESULT_BUFFER: usize = 64;

type Fetched = (String, bool);

/// One task per key with no cap on concurrent requests
///
/// Kept as a baseline for comparison; large key lists open as many requests
/// as there are keys. Prefer [`BoundedFanOut`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnboundedFanOut;

#[async_trait]
impl FetchStrategy for UnboundedFanOut {
    fn name(&self) -> &'static str {
        "unbounded"
    }

    async fn fetch(&self, client: Arc<dyn CacheClient>, keys: &[String]) -> Result<FetchReport> {
        if keys.is_empty() {
            return Ok(FetchReport::default());
        }

        let mut aggregator = Aggregator::new(keys.len());
        let failures = aggregator.failure_counter();
        let (results, inbox) = mpsc::channel(RESULT_BUFFER);
        let mut producers = JoinSet::new();

        for key in keys {
            let client = Arc::clone(&client);
            let results = results.clone();
            let failures = failures.clone();
            let key = key.clone();
            producers.spawn(
                async move {
                    match fetch_one(client.as_ref(), &key).await {
                        Ok(value) => {
                            let _ = results.send((key, value)).await;
                        }
                        Err(failure) => failures.record(&key, &failure),
                    }
                }
                .in_current_span(),
            );
        }
        drop(results);
        debug!(tasks = keys.len(), "Dispatched fetch tasks");

        gather(&mut aggregator, inbox, producers).await;
        Ok(aggregator.finish())
    }
}

/// A fixed pool of workers draining a shared queue of keys
///
/// At most `limit` requests are in flight regardless of how many keys are
/// fetched.
#[derive(Debug, Clone, Copy)]
pub struct BoundedFanOut {
    limit: usize,
}

impl BoundedFanOut {
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::configuration(
                "bounded fan-out needs a concurrency limit of at least 1",
            ));
        }
        Ok(Self { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for BoundedFanOut {
    fn default() -> Self {
        Self {
            limit: DEFAULT_CONCURRENCY,
        }
    }
}

#[async_trait]
impl FetchStrategy for BoundedFanOut {
    fn name(&self) -> &'static str {
        "bounded"
    }

    async fn fetch(&self, client: Arc<dyn CacheClient>, keys: &[String]) -> Result<FetchReport> {
        if keys.is_empty() {
            return Ok(FetchReport::default());
        }

        let mut aggregator = Aggregator::new(keys.len());
        let failures = aggregator.failure_counter();
        let queue = Arc::new(SegQueue::new());
        for key in keys {
            queue.push(key.clone());
        }

        let (results, inbox) = mpsc::channel(RESULT_BUFFER);
        let mut workers = JoinSet::new();
        let pool_size = self.limit.min(keys.len());
        for _ in 0..pool_size {
            let client = Arc::clone(&client);
            let queue = Arc::clone(&queue);
            let results = results.clone();
            let failures = failures.clone();
            workers.spawn(
                async move {
                    while let Some(key) = queue.pop() {
                        match fetch_one(client.as_ref(), &key).await {
                            Ok(value) => {
                                if results.send((key, value)).await.is_err() {
                                    break;
                                }
                            }
                            Err(failure) => failures.record(&key, &failure),
                        }
                    }
                }
                .in_current_span(),
            );
        }
        drop(results);
        debug!(workers = pool_size, "Started worker pool");

        gather(&mut aggregator, inbox, workers).await;

        // Keys left behind when every worker died
        while let Some(key) = queue.pop() {
            aggregator.record_failure(
                &key,
                &KeyFailure::Client("worker pool stopped before fetching key".to_string()),
            );
        }
        Ok(aggregator.finish())
    }
}

/// Drain `inbox` into the aggregator while waiting for every producer
///
/// A producer that panics is counted as one failed key.
async fn gather(
    aggregator: &mut Aggregator,
    mut inbox: mpsc::Receiver<Fetched>,
    mut producers: JoinSet<()>,
) {
    let failures: FailureCounter = aggregator.failure_counter();
    let barrier = async move {
        while let Some(joined) = producers.join_next().await {
            if let Err(e) = joined {
                failures.record_lost(&e.to_string());
            }
        }
    };
    let collector = async {
        while let Some((key, value)) = inbox.recv().await {
            aggregator.record_success(key, value);
        }
    };
    tokio::join!(barrier, collector);
}
