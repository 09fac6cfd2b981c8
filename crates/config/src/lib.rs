//! Configuration loading for flagbench
//!
//! This crate turns the process environment (plus an optional `.env` file)
//! into the connection settings handed to the cache client.

pub mod config;
pub mod loader;

pub use config::ClusterConfig;
pub use loader::{load_dotenv, ConfigLoader};
