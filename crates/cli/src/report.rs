//! Printing run results to stdout

use flagbench_cache::CallSnapshot;
use flagbench_core::FetchReport;
use serde::Serialize;
use std::time::Duration;

/// Outcome of one strategy invocation
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub strategy: String,
    pub keys: usize,
    pub values: usize,
    pub failed: usize,
    pub elapsed_ms: f64,
    pub requests: usize,
    pub peak_in_flight: usize,
}

impl RunSummary {
    pub fn new(
        strategy: &str,
        keys: usize,
        report: &FetchReport,
        elapsed: Duration,
        calls: &CallSnapshot,
    ) -> Self {
        Self {
            strategy: strategy.to_string(),
            keys,
            values: report.len(),
            failed: report.failed,
            elapsed_ms: millis(elapsed),
            requests: calls.requests(),
            peak_in_flight: calls.peak_in_flight,
        }
    }

    pub fn print(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            println!(
                "{}: {}/{} flags read, {} failed in {:.2}ms ({} requests, peak {} in flight)",
                self.strategy,
                self.values,
                self.keys,
                self.failed,
                self.elapsed_ms,
                self.requests,
                self.peak_in_flight
            );
        }
        Ok(())
    }
}

/// Timings for one strategy across several rounds
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub strategy: String,
    pub rounds: usize,
    pub failed: usize,
    pub min_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
    pub requests_per_round: usize,
    pub peak_in_flight: usize,
}

impl ComparisonRow {
    pub fn from_rounds(strategy: &str, timings: &[Duration], failed: usize, calls: &CallSnapshot) -> Self {
        let rounds = timings.len();
        let min = timings.iter().min().copied().unwrap_or_default();
        let max = timings.iter().max().copied().unwrap_or_default();
        let total: Duration = timings.iter().sum();
        let mean = if rounds == 0 {
            Duration::ZERO
        } else {
            total / rounds as u32
        };

        Self {
            strategy: strategy.to_string(),
            rounds,
            failed,
            min_ms: millis(min),
            mean_ms: millis(mean),
            max_ms: millis(max),
            requests_per_round: if rounds == 0 { 0 } else { calls.requests() / rounds },
            peak_in_flight: calls.peak_in_flight,
        }
    }
}

pub fn print_table(rows: &[ComparisonRow], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
        "strategy", "min ms", "mean ms", "max ms", "req/round", "peak", "failed"
    );
    for row in rows {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10} {:>8} {:>8}",
            row.strategy,
            row.min_ms,
            row.mean_ms,
            row.max_ms,
            row.requests_per_round,
            row.peak_in_flight,
            row.failed
        );
    }
    Ok(())
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
