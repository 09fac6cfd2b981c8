use crate::backend::BackendArgs;
use crate::report::{print_table, ComparisonRow};
use anyhow::bail;
use flagbench_fetch::{execute as fetch, seed_defaults, StrategyKind};
use std::time::Instant;
use tracing::info;

pub struct CompareOptions {
    pub concurrency: usize,
    pub rounds: usize,
    pub seed: bool,
    pub json: bool,
}

pub async fn execute(backend: &BackendArgs, options: CompareOptions) -> anyhow::Result<bool> {
    if options.rounds == 0 {
        bail!("--rounds must be at least 1");
    }

    let strategies = StrategyKind::all()
        .iter()
        .map(|kind| kind.build(options.concurrency))
        .collect::<Result<Vec<_>, _>>()?;

    let session = backend.connect().await?;
    let keys = backend.generate_keys();
    if options.seed {
        seed_defaults(session.cache.as_ref(), &keys).await?;
    }

    let mut rows = Vec::with_capacity(strategies.len());
    for strategy in &strategies {
        session.cache.reset();
        let mut timings = Vec::with_capacity(options.rounds);
        let mut failed = 0;

        for round in 0..options.rounds {
            let started = Instant::now();
            let report = fetch(strategy.as_ref(), session.client(), &keys).await?;
            timings.push(started.elapsed());
            failed += report.failed;
            info!(strategy = strategy.name(), round, "Round finished");
        }

        rows.push(ComparisonRow::from_rounds(
            strategy.name(),
            &timings,
            failed,
            &session.cache.snapshot(),
        ));
    }

    print_table(&rows, options.json)?;
    Ok(rows.iter().all(|row| row.failed == 0))
}
