use flagbench_core::constants::FLAGBENCH_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter is taken from `FLAGBENCH_LOG`, then `RUST_LOG`, falling back to
/// `default_level`. Output goes to stderr so reports on stdout stay clean.
pub fn init(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_env(FLAGBENCH_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Span for one strategy invocation
pub fn fetch_span(strategy: &str, keys: usize) -> Span {
    span!(Level::INFO, "fetch", strategy = %strategy, keys = %keys)
}

/// Span for a seeding batch
pub fn seed_span(keys: usize) -> Span {
    span!(Level::INFO, "seed", keys = %keys)
}
