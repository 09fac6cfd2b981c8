//! Core error type definitions

use std::time::Duration;

/// Result type alias for flagbench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for flagbench operations using thiserror
///
/// Every variant here aborts the operation that produced it. Per-key misses
/// and undecodable values are not errors; they are counted by the fetch
/// strategies instead (see [`crate::KeyFailure`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The cache client could not be built or could not reach the cluster
    Setup { endpoint: String, message: String },

    /// A pipelined write did not complete
    BatchWrite { keys: usize, message: String },

    /// A pipelined read did not complete; no partial results exist
    BatchRead { keys: usize, message: String },

    /// A single client call failed
    Client { operation: String, message: String },

    /// Invalid configuration (strategy, concurrency limit, host list)
    Configuration { message: String },

    /// Environment variable missing or unparseable
    Environment { variable: String, message: String },

    /// Operation deadline elapsed
    Timeout {
        operation: String,
        duration: Duration,
    },
}
