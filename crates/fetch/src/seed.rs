//! Writing fixture flags before a fetch run

use flagbench_cache::CacheClient;
use flagbench_core::{constants::DEFAULT_SEED_TTL, encode_flag, Error, Result, SetEntry};
use flagbench_utils::seed_span;
use std::time::Duration;
use tracing::{debug, error, info, Instrument};

/// Write `value` to every key with expiry `ttl` in a single pipelined request
pub async fn seed(
    client: &dyn CacheClient,
    keys: &[String],
    value: bool,
    ttl: Duration,
) -> Result<()> {
    if keys.is_empty() {
        debug!("No keys to seed");
        return Ok(());
    }

    let entries: Vec<SetEntry> = keys
        .iter()
        .map(|key| SetEntry::new(key.clone(), encode_flag(value), ttl))
        .collect();

    client
        .batch_set(&entries)
        .instrument(seed_span(keys.len()))
        .await
        .map_err(|e| {
            error!(error = %e, keys = keys.len(), "Seeding failed");
            match e {
                Error::BatchWrite { .. } => e,
                other => Error::batch_write(keys.len(), other.to_string()),
            }
        })?;

    info!(keys = keys.len(), ttl = ?ttl, "Seeded keys");
    Ok(())
}

/// Seed every key with `true` for five minutes
pub async fn seed_defaults(client: &dyn CacheClient, keys: &[String]) -> Result<()> {
    seed(client, keys, true, DEFAULT_SEED_TTL).await
}
