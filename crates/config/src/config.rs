//! Cluster connection settings

use flagbench_core::constants::{
    DEFAULT_DIAL_TIMEOUT, DEFAULT_IDLE_TIMEOUT, DEFAULT_POOL_TIMEOUT, DEFAULT_READ_TIMEOUT,
    DEFAULT_WRITE_TIMEOUT,
};
use std::fmt;
use std::time::Duration;
use zeroize::Zeroizing;

/// Connection settings for a clustered cache
#[derive(Clone)]
pub struct ClusterConfig {
    /// Seed nodes as `host:port`
    pub hosts: Vec<String>,
    pub username: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub dial_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub pool_timeout: Duration,
    pub idle_timeout: Duration,
}

impl ClusterConfig {
    /// Settings for the given seed nodes with default timeouts and no credentials
    pub fn new(hosts: Vec<String>) -> Self {
        Self {
            hosts,
            username: None,
            password: None,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            pool_timeout: DEFAULT_POOL_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.username = username;
        self.password = password.map(Zeroizing::new);
        self
    }

    /// First seed node, used to label setup errors
    pub fn primary_host(&self) -> &str {
        self.hosts.first().map(String::as_str).unwrap_or("<none>")
    }

    /// Per-request deadline covering both directions of a round trip
    pub fn response_timeout(&self) -> Duration {
        self.read_timeout.max(self.write_timeout)
    }
}

impl fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("hosts", &self.hosts)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("dial_timeout", &self.dial_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .field("pool_timeout", &self.pool_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_client_options() {
        let config = ClusterConfig::new(vec!["127.0.0.1:7000".to_string()]);
        assert_eq!(config.dial_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(1));
        assert_eq!(config.write_timeout, Duration::from_secs(1));
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
        assert_eq!(config.primary_host(), "127.0.0.1:7000");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ClusterConfig::new(vec!["a:1".to_string()])
            .with_credentials(Some("svc".to_string()), Some("hunter2".to_string()));
        let rendered = format!("{config:?}");
        assert!(rendered.contains("svc"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_response_timeout_takes_slower_direction() {
        let mut config = ClusterConfig::new(vec!["a:1".to_string()]);
        config.write_timeout = Duration::from_millis(1500);
        assert_eq!(config.response_timeout(), Duration::from_millis(1500));
    }
}
