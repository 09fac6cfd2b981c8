use crate::backend::BackendArgs;
use clap::Subcommand;
use flagbench_core::constants::DEFAULT_CONCURRENCY;
use flagbench_fetch::StrategyKind;

pub mod compare;
pub mod ping;
pub mod run;

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the backend is reachable
    Ping,

    /// Seed keys and read them back with one strategy
    Run {
        /// sequential, pipelined, unbounded or bounded
        #[arg(short, long, default_value_t = StrategyKind::Bounded)]
        strategy: StrategyKind,

        /// Worker pool size for the bounded strategy
        #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Abort the fetch after this many milliseconds
        #[arg(long, value_name = "MS")]
        deadline_ms: Option<u64>,

        /// Read keys without writing them first; unless `--sequential-keys`
        /// names keys an earlier run seeded, every key misses
        #[arg(long)]
        no_seed: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Time every strategy over the same seeded keys
    Compare {
        /// Worker pool size for the bounded strategy
        #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Fetches per strategy
        #[arg(short, long, default_value_t = 5)]
        rounds: usize,

        /// Read keys without writing them first
        #[arg(long)]
        no_seed: bool,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Returns whether every flag was read without failure
    pub async fn execute(self, backend: &BackendArgs) -> anyhow::Result<bool> {
        match self {
            Commands::Ping => ping::execute(backend).await,
            Commands::Run {
                strategy,
                concurrency,
                deadline_ms,
                no_seed,
                json,
            } => {
                run::execute(
                    backend,
                    run::RunOptions {
                        strategy,
                        concurrency,
                        deadline_ms,
                        seed: !no_seed,
                        json,
                    },
                )
                .await
            }
            Commands::Compare {
                concurrency,
                rounds,
                no_seed,
                json,
            } => {
                compare::execute(
                    backend,
                    compare::CompareOptions {
                        concurrency,
                        rounds,
                        seed: !no_seed,
                        json,
                    },
                )
                .await
            }
        }
    }
}
