//! Values exchanged between cache clients and fetch strategies

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Outcome of one strategy invocation
///
/// `values` holds every key that was read and decoded; `failed` counts the
/// keys that were not. For distinct input keys,
/// `values.len() + failed == keys.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    pub values: HashMap<String, bool>,
    pub failed: usize,
}

impl FetchReport {
    #[must_use]
    pub fn new(values: HashMap<String, bool>, failed: usize) -> Self {
        Self { values, failed }
    }

    /// Number of keys that produced a value
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.failed == 0
    }

    /// True when no key failed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Keys accounted for, successful or not
    #[must_use]
    pub fn total(&self) -> usize {
        self.values.len() + self.failed
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }
}

/// One slot of a pipelined read, positionally matched to its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchReply {
    Value(String),
    Missing,
    Error(String),
}

/// One entry of a pipelined write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetEntry {
    pub key: String,
    pub value: String,
    pub ttl: Duration,
}

impl SetEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ttl,
        }
    }
}

/// Why a single key did not produce a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFailure {
    /// No value stored (never written or expired)
    Missing,
    /// The client call for this key failed
    Client(String),
    /// A value exists but is not a flag literal
    Malformed(String),
}

impl fmt::Display for KeyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFailure::Missing => write!(f, "no value stored"),
            KeyFailure::Client(message) => write!(f, "client error: {message}"),
            KeyFailure::Malformed(raw) => write!(f, "malformed flag value '{raw}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_accounting() {
        let mut values = HashMap::new();
        values.insert("a".to_string(), true);
        values.insert("b".to_string(), false);
        let report = FetchReport::new(values, 1);

        assert_eq!(report.len(), 2);
        assert_eq!(report.total(), 3);
        assert!(!report.is_clean());
        assert_eq!(report.get("b"), Some(false));
        assert_eq!(report.get("c"), None);
    }

    #[test]
    fn test_empty_report() {
        let report = FetchReport::default();
        assert!(report.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_report_serializes() {
        let mut values = HashMap::new();
        values.insert("a".to_string(), true);
        let json = serde_json::to_value(FetchReport::new(values, 2)).unwrap();
        assert_eq!(json["failed"], 2);
        assert_eq!(json["values"]["a"], true);
    }
}
