use clap::Parser;
use std::process::ExitCode;

mod backend;
mod commands;
mod report;

use backend::BackendArgs;
use commands::Commands;

#[derive(Parser)]
#[command(name = "flagbench")]
#[command(about = "Compare ways of bulk-reading boolean flags from a Redis cluster", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    /// Default log filter when FLAGBENCH_LOG and RUST_LOG are unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    flagbench_utils::init(&cli.log_level)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let clean = cli.command.execute(&cli.backend).await?;
    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
