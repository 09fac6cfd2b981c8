//! Bulk flag reads against a cache cluster
//!
//! Four interchangeable ways to read N boolean flags, all returning the same
//! [`FetchReport`](flagbench_core::FetchReport):
//!
//! - [`Sequential`]: one request per key, one at a time
//! - [`Pipelined`]: one pipelined request for the whole list
//! - [`UnboundedFanOut`]: one task per key, no cap on in-flight requests
//! - [`BoundedFanOut`]: a fixed-size worker pool; the one to use outside benchmarks
//!
//! Keys that are missing, fail at the client, or hold something other than a
//! flag literal are counted as failures and never abort the batch. Only a
//! failed pipelined request, a failed seed write, or an elapsed deadline
//! abort an invocation.

pub mod aggregate;
pub mod kind;
pub mod seed;
pub mod strategy;

pub use aggregate::{Aggregator, FailureCounter};
pub use kind::StrategyKind;
pub use seed::{seed, seed_defaults};
pub use strategy::{
    execute, BoundedFanOut, FetchStrategy, Pipelined, Sequential, UnboundedFanOut, WithDeadline,
};
