//! Hash slot ownership for a Redis Cluster
//!
//! Built once from `CLUSTER SLOTS` when the connection is set up. Keys are
//! grouped by the node that owns their slot so that a batch costs one
//! pipeline per node.

use flagbench_core::{Error, Result};
use redis::cluster_routing::get_slot;
use redis::{FromRedisValue, Value};
use std::collections::BTreeMap;

/// An inclusive range of hash slots served by one primary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRange {
    pub start: u16,
    pub end: u16,
    /// Primary as `host:port`
    pub node: String,
}

/// Slot ranges ordered by their first slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotMap {
    ranges: Vec<SlotRange>,
}

/// Where a group of keys is sent
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Owner {
    Node(String),
    /// Slot missing from the map; the cluster client routes it on its own
    Unmapped(u16),
}

impl SlotMap {
    pub fn new(mut ranges: Vec<SlotRange>) -> Self {
        ranges.sort_by_key(|range| range.start);
        Self { ranges }
    }

    /// Parse a `CLUSTER SLOTS` reply
    ///
    /// Each entry is `[start, end, [host, port, ..], replicas..]`; only the
    /// primary is kept.
    pub fn from_cluster_slots(reply: &Value) -> Result<Self> {
        let malformed = |e: redis::RedisError| {
            Error::client("CLUSTER SLOTS", format!("unexpected reply: {e}"))
        };

        let entries = Vec::<Vec<Value>>::from_redis_value(reply).map_err(malformed)?;
        let mut ranges = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.len() < 3 {
                return Err(Error::client(
                    "CLUSTER SLOTS",
                    format!("slot entry has {} fields, expected at least 3", entry.len()),
                ));
            }
            let start = u16::from_redis_value(&entry[0]).map_err(malformed)?;
            let end = u16::from_redis_value(&entry[1]).map_err(malformed)?;
            let primary = Vec::<Value>::from_redis_value(&entry[2]).map_err(malformed)?;
            if primary.len() < 2 {
                return Err(Error::client("CLUSTER SLOTS", "primary entry lacks host or port"));
            }
            let host = String::from_redis_value(&primary[0]).map_err(malformed)?;
            let port = u16::from_redis_value(&primary[1]).map_err(malformed)?;
            ranges.push(SlotRange {
                start,
                end,
                node: format!("{host}:{port}"),
            });
        }
        Ok(Self::new(ranges))
    }

    /// Distinct primaries, sorted
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = self.ranges.iter().map(|r| r.node.as_str()).collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn node_for_slot(&self, slot: u16) -> Option<&str> {
        let index = self.ranges.partition_point(|range| range.start <= slot);
        let range = self.ranges.get(index.checked_sub(1)?)?;
        (slot <= range.end).then_some(range.node.as_str())
    }

    pub fn owner(&self, key: &str) -> Owner {
        let slot = get_slot(key.as_bytes());
        match self.node_for_slot(slot) {
            Some(node) => Owner::Node(node.to_string()),
            None => Owner::Unmapped(slot),
        }
    }

    /// Input positions grouped by the node that owns their key
    pub fn group<'a, I>(&self, keys: I) -> BTreeMap<Owner, Vec<usize>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut groups: BTreeMap<Owner, Vec<usize>> = BTreeMap::new();
        for (position, key) in keys.into_iter().enumerate() {
            groups.entry(self.owner(key)).or_default().push(position);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_nodes() -> SlotMap {
        SlotMap::new(vec![
            SlotRange {
                start: 10923,
                end: 16383,
                node: "10.0.0.3:7000".to_string(),
            },
            SlotRange {
                start: 0,
                end: 5460,
                node: "10.0.0.1:7000".to_string(),
            },
            SlotRange {
                start: 5461,
                end: 10922,
                node: "10.0.0.2:7000".to_string(),
            },
        ])
    }

    fn bulk(text: &str) -> Value {
        Value::BulkString(text.as_bytes().to_vec())
    }

    #[test]
    fn test_one_group_per_node() {
        let map = three_nodes();
        let keys: Vec<String> = (0..1000).map(|i| format!("delivery:{i}")).collect();

        let groups = map.group(keys.iter().map(String::as_str));
        assert_eq!(groups.len(), map.node_count());
        assert_eq!(groups.len(), 3);

        let mut positions: Vec<usize> = groups.into_values().flatten().collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn test_node_lookup_at_range_edges() {
        let map = three_nodes();
        assert_eq!(map.node_for_slot(0), Some("10.0.0.1:7000"));
        assert_eq!(map.node_for_slot(5460), Some("10.0.0.1:7000"));
        assert_eq!(map.node_for_slot(5461), Some("10.0.0.2:7000"));
        assert_eq!(map.node_for_slot(16383), Some("10.0.0.3:7000"));
    }

    #[test]
    fn test_uncovered_slots_stay_separate() {
        let map = SlotMap::new(vec![SlotRange {
            start: 0,
            end: 99,
            node: "a:1".to_string(),
        }]);
        assert_eq!(map.node_for_slot(100), None);
        assert_eq!(SlotMap::default().owner("k"), Owner::Unmapped(get_slot(b"k")));
    }

    #[test]
    fn test_parse_cluster_slots_reply() {
        let entry = |start: i64, end: i64, host: &str, port: i64| {
            Value::Array(vec![
                Value::Int(start),
                Value::Int(end),
                Value::Array(vec![bulk(host), Value::Int(port), bulk("node-id")]),
                Value::Array(vec![bulk("replica"), Value::Int(7001)]),
            ])
        };
        let reply = Value::Array(vec![
            entry(5461, 16383, "10.0.0.2", 7000),
            entry(0, 5460, "10.0.0.1", 7000),
        ]);

        let map = SlotMap::from_cluster_slots(&reply).unwrap();
        assert_eq!(map.nodes(), vec!["10.0.0.1:7000", "10.0.0.2:7000"]);
        assert_eq!(map.node_for_slot(42), Some("10.0.0.1:7000"));
        assert_eq!(map.node_for_slot(9000), Some("10.0.0.2:7000"));
    }

    #[test]
    fn test_parse_rejects_short_entries() {
        let reply = Value::Array(vec![Value::Array(vec![Value::Int(0), Value::Int(10)])]);
        assert!(matches!(
            SlotMap::from_cluster_slots(&reply),
            Err(Error::Client { .. })
        ));
    }
}
