//! Core domain types, errors, and constants for `flagbench`.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by every crate in
//!   the workspace. Fatal conditions (setup, batch writes, batch reads) are
//!   variants here; per-key misses are not.
//! - **`types`**: `FetchReport`, `BatchReply`, `SetEntry` and `KeyFailure`, the
//!   values that flow between the cache client and the fetch strategies.
//! - **`flag`**: encoding and decoding of boolean flag literals.
//! - **`constants`**: environment variable names and shared defaults.

pub mod constants;
pub mod errors;
pub mod flag;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    flag::{decode_flag, encode_flag},
    types::*,
};
