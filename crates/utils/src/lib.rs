//! Shared utilities for flagbench

pub mod tracing;

pub use self::tracing::*;
