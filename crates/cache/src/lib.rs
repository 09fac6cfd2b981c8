//! Cache clients for flagbench
//!
//! This crate provides the client seam the fetch strategies are written
//! against, together with its backends:
//! - `RedisClusterCache`: a Redis Cluster connection with one pipeline per primary
//! - `MemoryCache`: an in-process store with expiry and simulated latency
//! - `InstrumentedCache`: a wrapper counting calls and concurrent requests,
//!   with fault injection for tests

pub mod cluster;
pub mod instrumented;
pub mod memory;
pub mod slots;
pub mod traits;

pub use cluster::RedisClusterCache;
pub use instrumented::{CallSnapshot, InstrumentedCache};
pub use memory::MemoryCache;
pub use slots::{SlotMap, SlotRange};
pub use traits::CacheClient;
