//! Fetch strategies
//!
//! Every strategy takes the client and an explicit key list and returns a
//! [`FetchReport`]. Per-key problems (absent key, client error, malformed
//! value) become failures in the report; the strategies only return `Err` for
//! conditions that leave no usable result at all.

mod deadline;
mod fanout;
mod pipelined;
mod sequential;

pub use deadline::WithDeadline;
pub use fanout::{BoundedFanOut, UnboundedFanOut};
pub use pipelined::Pipelined;
pub use sequential::Sequential;

use async_trait::async_trait;
use flagbench_cache::CacheClient;
use flagbench_core::{decode_flag, FetchReport, KeyFailure, Result};
use flagbench_utils::fetch_span;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Instrument};

/// A way of reading many flags from a cache
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// Read every key and report values and failures
    async fn fetch(&self, client: Arc<dyn CacheClient>, keys: &[String]) -> Result<FetchReport>;
}

#[async_trait]
impl<T: FetchStrategy + ?Sized> FetchStrategy for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch(&self, client: Arc<dyn CacheClient>, keys: &[String]) -> Result<FetchReport> {
        (**self).fetch(client, keys).await
    }
}

/// Run `strategy` inside a `fetch` span and log the outcome
pub async fn execute(
    strategy: &dyn FetchStrategy,
    client: Arc<dyn CacheClient>,
    keys: &[String],
) -> Result<FetchReport> {
    let span = fetch_span(strategy.name(), keys.len());
    async {
        let started = Instant::now();
        let report = strategy.fetch(client, keys).await?;
        info!(
            values = report.len(),
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetch completed"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

/// Read and decode one key with a point request
pub(crate) async fn fetch_one(
    client: &dyn CacheClient,
    key: &str,
) -> std::result::Result<bool, KeyFailure> {
    match client.get(key).await {
        Ok(Some(raw)) => decode(raw),
        Ok(None) => Err(KeyFailure::Missing),
        Err(e) => Err(KeyFailure::Client(e.to_string())),
    }
}

pub(crate) fn decode(raw: String) -> std::result::Result<bool, KeyFailure> {
    decode_flag(&raw).ok_or(KeyFailure::Malformed(raw))
}
