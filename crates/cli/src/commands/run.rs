use crate::backend::BackendArgs;
use crate::report::RunSummary;
use flagbench_fetch::{execute as fetch, seed_defaults, FetchStrategy, StrategyKind, WithDeadline};
use std::time::{Duration, Instant};
use tracing::warn;

pub struct RunOptions {
    pub strategy: StrategyKind,
    pub concurrency: usize,
    pub deadline_ms: Option<u64>,
    pub seed: bool,
    pub json: bool,
}

pub async fn execute(backend: &BackendArgs, options: RunOptions) -> anyhow::Result<bool> {
    let strategy = build_strategy(&options)?;
    let session = backend.connect().await?;
    let keys = backend.generate_keys();

    if options.seed {
        seed_defaults(session.cache.as_ref(), &keys).await?;
    }
    session.cache.reset();

    let started = Instant::now();
    let report = fetch(strategy.as_ref(), session.client(), &keys).await?;
    let elapsed = started.elapsed();

    if !report.is_clean() {
        warn!(failed = report.failed, "Some flags could not be read");
    }

    RunSummary::new(
        strategy.name(),
        keys.len(),
        &report,
        elapsed,
        &session.cache.snapshot(),
    )
    .print(options.json)?;
    Ok(report.is_clean())
}

fn build_strategy(options: &RunOptions) -> anyhow::Result<Box<dyn FetchStrategy>> {
    let strategy = options.strategy.build(options.concurrency)?;
    Ok(match options.deadline_ms {
        Some(ms) => Box::new(WithDeadline::new(strategy, Duration::from_millis(ms))),
        None => strategy,
    })
}
