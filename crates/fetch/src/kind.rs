//! Selecting a strategy by name

use crate::strategy::{BoundedFanOut, FetchStrategy, Pipelined, Sequential, UnboundedFanOut};
use flagbench_core::Result;
use std::fmt;
use std::str::FromStr;

/// The available fetch strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Sequential,
    Pipelined,
    Unbounded,
    #[default]
    Bounded,
}

impl StrategyKind {
    pub const fn all() -> [StrategyKind; 4] {
        [
            StrategyKind::Sequential,
            StrategyKind::Pipelined,
            StrategyKind::Unbounded,
            StrategyKind::Bounded,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Pipelined => "pipelined",
            StrategyKind::Unbounded => "unbounded",
            StrategyKind::Bounded => "bounded",
        }
    }

    /// Instantiate the strategy; `concurrency` only applies to [`StrategyKind::Bounded`]
    pub fn build(&self, concurrency: usize) -> Result<Box<dyn FetchStrategy>> {
        Ok(match self {
            StrategyKind::Sequential => Box::new(Sequential),
            StrategyKind::Pipelined => Box::new(Pipelined),
            StrategyKind::Unbounded => Box::new(UnboundedFanOut),
            StrategyKind::Bounded => Box::new(BoundedFanOut::new(concurrency)?),
        })
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    /// Case-insensitive; `-` and `_` are interchangeable
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().replace('_', "-").as_str() {
            "sequential" | "seq" => Ok(StrategyKind::Sequential),
            "pipelined" | "pipeline" | "pipe" => Ok(StrategyKind::Pipelined),
            "unbounded" | "unbounded-fan-out" => Ok(StrategyKind::Unbounded),
            "bounded" | "bounded-fan-out" | "pool" => Ok(StrategyKind::Bounded),
            _ => Err(format!(
                "unknown strategy '{value}' (expected sequential, pipelined, unbounded or bounded)"
            )),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
