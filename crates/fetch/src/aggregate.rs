//! Merging per-key outcomes into a report

use flagbench_core::{FetchReport, KeyFailure};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared failure tally
///
/// Producer tasks hold clones; the owning [`Aggregator`] reads the same
/// counter when it builds the report.
#[derive(Debug, Clone, Default)]
pub struct FailureCounter(Arc<AtomicUsize>);

impl FailureCounter {
    /// Count a key that produced no value
    pub fn record(&self, key: &str, failure: &KeyFailure) {
        self.0.fetch_add(1, Ordering::SeqCst);
        debug!(key = %key, reason = %failure, "Key fetch failed");
    }

    /// Count a key whose producer died without reporting which key it was
    pub fn record_lost(&self, reason: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
        warn!(reason = %reason, "Fetch task ended without a result");
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Builds a [`FetchReport`] from successes and failures
///
/// Only the owner writes the value map; concurrent producers report failures
/// through a [`FailureCounter`] and successes through the owner.
#[derive(Debug)]
pub struct Aggregator {
    values: HashMap<String, bool>,
    failures: FailureCounter,
}

impl Aggregator {
    pub fn new(expected: usize) -> Self {
        Self {
            values: HashMap::with_capacity(expected),
            failures: FailureCounter::default(),
        }
    }

    pub fn record_success(&mut self, key: String, value: bool) {
        self.values.insert(key, value);
    }

    pub fn record_failure(&self, key: &str, failure: &KeyFailure) {
        self.failures.record(key, failure);
    }

    /// Record either outcome for `key`
    pub fn record(&mut self, key: String, outcome: Result<bool, KeyFailure>) {
        match outcome {
            Ok(value) => self.record_success(key, value),
            Err(failure) => self.record_failure(&key, &failure),
        }
    }

    /// Handle for producers that run outside the aggregator's task
    pub fn failure_counter(&self) -> FailureCounter {
        self.failures.clone()
    }

    pub fn finish(self) -> FetchReport {
        FetchReport::new(self.values, self.failures.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_outcomes() {
        let mut aggregator = Aggregator::new(3);
        aggregator.record("a".to_string(), Ok(true));
        aggregator.record("b".to_string(), Err(KeyFailure::Missing));
        aggregator.record(
            "c".to_string(),
            Err(KeyFailure::Malformed("maybe".to_string())),
        );

        let report = aggregator.finish();
        assert_eq!(report.get("a"), Some(true));
        assert_eq!(report.len(), 1);
        assert_eq!(report.failed, 2);
    }

    #[test]
    fn test_report_reads_shared_counter() {
        let aggregator = Aggregator::new(0);
        let counter = aggregator.failure_counter();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    counter.record(&format!("k{i}"), &KeyFailure::Missing);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        counter.record_lost("task panicked");

        assert_eq!(aggregator.finish().failed, 9);
    }

    #[test]
    fn test_duplicate_successes_collapse() {
        let mut aggregator = Aggregator::new(2);
        aggregator.record_success("a".to_string(), true);
        aggregator.record_success("a".to_string(), true);
        assert_eq!(aggregator.finish().len(), 1);
    }
}
