//! Redis Cluster backend
//!
//! A pipeline is delivered to a single node, so every key in it must be owned
//! by that node. The slot map is read with `CLUSTER SLOTS` at connect time and
//! a direct connection is opened to each primary; batch operations then cost
//! one pipeline per primary, sent concurrently, with replies stitched back
//! into key order. Point reads go through the cluster connection, which
//! follows redirects on its own.

use crate::slots::{Owner, SlotMap};
use crate::traits::CacheClient;
use async_trait::async_trait;
use flagbench_config::ClusterConfig;
use flagbench_core::{BatchReply, Error, Result, SetEntry};
use redis::aio::MultiplexedConnection;
use redis::cluster::ClusterClientBuilder;
use redis::cluster_async::ClusterConnection;
use redis::{AsyncCommands, ErrorKind, FromRedisValue, IntoConnectionInfo, RedisResult, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Cache client backed by a Redis Cluster connection
#[derive(Clone)]
pub struct RedisClusterCache {
    connection: ClusterConnection,
    endpoint: String,
    slots: SlotMap,
    primaries: HashMap<String, MultiplexedConnection>,
    response_timeout: Duration,
}

impl RedisClusterCache {
    /// Build a cluster client from `config`, connect, verify with PING, and
    /// open a pipeline connection to every primary
    pub async fn connect(config: &ClusterConfig) -> Result<Self> {
        let endpoint = config.primary_host().to_string();
        let nodes: Vec<String> = config.hosts.iter().map(|host| node_url(host)).collect();

        let mut builder = ClusterClientBuilder::new(nodes)
            .connection_timeout(config.dial_timeout)
            .response_timeout(config.response_timeout());
        if let Some(username) = &config.username {
            builder = builder.username(username.clone());
        }
        if let Some(password) = &config.password {
            builder = builder.password(password.as_str().to_owned());
        }

        let client = builder
            .build()
            .map_err(|e| Error::setup(&endpoint, e.to_string()))?;
        let connection = client
            .get_async_connection()
            .await
            .map_err(|e| Error::setup(&endpoint, e.to_string()))?;

        let mut cache = Self {
            connection,
            endpoint,
            slots: SlotMap::default(),
            primaries: HashMap::new(),
            response_timeout: config.response_timeout(),
        };
        cache
            .ping()
            .await
            .map_err(|e| Error::setup(&cache.endpoint, e.to_string()))?;
        cache.slots = cache
            .load_slots()
            .await
            .map_err(|e| Error::setup(&cache.endpoint, e.to_string()))?;

        let connecting = cache.slots.nodes().into_iter().map(|node| async move {
            let connection = connect_primary(node, config).await?;
            Ok::<_, Error>((node.to_string(), connection))
        });
        cache.primaries = futures::future::try_join_all(connecting)
            .await?
            .into_iter()
            .collect();

        info!(
            endpoint = %cache.endpoint,
            seeds = config.hosts.len(),
            primaries = cache.primaries.len(),
            "Connected to cache cluster"
        );
        Ok(cache)
    }

    async fn load_slots(&self) -> Result<SlotMap> {
        let mut connection = self.connection.clone();
        let reply: Value = redis::cmd("CLUSTER")
            .arg("SLOTS")
            .query_async(&mut connection)
            .await
            .map_err(|e| Error::client("CLUSTER SLOTS", e.to_string()))?;
        let slots = SlotMap::from_cluster_slots(&reply)?;
        if slots.is_empty() {
            return Err(Error::client("CLUSTER SLOTS", "no slots are assigned"));
        }
        Ok(slots)
    }

    /// Slot ownership as read at connect time
    pub fn slots(&self) -> &SlotMap {
        &self.slots
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `pipe` to the primary owning its keys
    ///
    /// Groups the slot map does not cover hold a single slot and go through
    /// the cluster connection.
    async fn query_owner<T: FromRedisValue>(
        &self,
        owner: &Owner,
        pipe: &redis::Pipeline,
    ) -> RedisResult<T> {
        if let Owner::Node(node) = owner {
            if let Some(connection) = self.primaries.get(node) {
                let mut connection = connection.clone();
                return match tokio::time::timeout(
                    self.response_timeout,
                    pipe.query_async(&mut connection),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err((ErrorKind::IoError, "pipeline response timed out").into()),
                };
            }
        }
        let mut connection = self.connection.clone();
        pipe.query_async(&mut connection).await
    }
}

async fn connect_primary(node: &str, config: &ClusterConfig) -> Result<MultiplexedConnection> {
    let mut info = node_url(node)
        .into_connection_info()
        .map_err(|e| Error::setup(node, e.to_string()))?;
    info.redis.username = config.username.clone();
    info.redis.password = config.password.as_ref().map(|p| p.as_str().to_owned());

    let client = redis::Client::open(info).map_err(|e| Error::setup(node, e.to_string()))?;
    match tokio::time::timeout(config.dial_timeout, client.get_multiplexed_async_connection()).await
    {
        Ok(Ok(connection)) => {
            debug!(node = %node, "Connected to primary");
            Ok(connection)
        }
        Ok(Err(e)) => Err(Error::setup(node, e.to_string())),
        Err(_) => Err(Error::setup(
            node,
            format!("connect timed out after {:?}", config.dial_timeout),
        )),
    }
}

#[async_trait]
impl CacheClient for RedisClusterCache {
    async fn ping(&self) -> Result<()> {
        let mut connection = self.connection.clone();
        let _: Value = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|e| Error::client("PING", e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut connection = self.connection.clone();
        let value: Option<String> = connection
            .get(key)
            .await
            .map_err(|e| Error::client("GET", e.to_string()))?;
        Ok(value)
    }

    async fn batch_get(&self, keys: &[String]) -> Result<Vec<BatchReply>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let groups = self.slots.group(keys.iter().map(String::as_str));
        debug!(keys = keys.len(), nodes = groups.len(), "Pipelining GET");

        let requests = groups.into_iter().map(|(owner, positions)| {
            let mut pipe = redis::pipe();
            for &position in &positions {
                pipe.cmd("GET").arg(&keys[position]);
            }
            async move {
                let values: Vec<Value> = self.query_owner(&owner, &pipe).await?;
                Ok::<_, redis::RedisError>((positions, values))
            }
        });
        let replies = futures::future::try_join_all(requests)
            .await
            .map_err(|e| Error::batch_read(keys.len(), e.to_string()))?;

        let mut slots = vec![BatchReply::Error("no reply".to_string()); keys.len()];
        for (positions, values) in replies {
            for (position, value) in positions.into_iter().zip(values) {
                slots[position] = reply_from_value(&value);
            }
        }
        Ok(slots)
    }

    async fn batch_set(&self, entries: &[SetEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let groups = self.slots.group(entries.iter().map(|entry| entry.key.as_str()));
        debug!(keys = entries.len(), nodes = groups.len(), "Pipelining SET");

        let requests = groups.into_iter().map(|(owner, positions)| {
            let mut pipe = redis::pipe();
            for entry in positions.into_iter().map(|position| &entries[position]) {
                let cmd = pipe.cmd("SET").arg(&entry.key).arg(&entry.value);
                if !entry.ttl.is_zero() {
                    cmd.arg("PX").arg(entry.ttl.as_millis() as u64);
                }
                cmd.ignore();
            }
            async move { self.query_owner::<()>(&owner, &pipe).await }
        });
        futures::future::try_join_all(requests)
            .await
            .map_err(|e| Error::batch_write(entries.len(), e.to_string()))?;
        Ok(())
    }
}

fn node_url(host: &str) -> String {
    if host.starts_with("redis://") || host.starts_with("rediss://") {
        host.to_string()
    } else {
        format!("redis://{host}")
    }
}

fn reply_from_value(value: &Value) -> BatchReply {
    match Option::<String>::from_redis_value(value) {
        Ok(Some(raw)) => BatchReply::Value(raw),
        Ok(None) => BatchReply::Missing,
        Err(e) => BatchReply::Error(e.to_string()),
    }
}
