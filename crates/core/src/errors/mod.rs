//! Error handling for flagbench operations

mod builders;
mod display;
mod types;

pub use types::{Error, Result};
