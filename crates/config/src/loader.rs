//! Configuration loader for flagbench
//!
//! Settings come from the process environment. A `.env` file in the working
//! directory is loaded first when present; variables already set in the
//! process take precedence over the file.

use crate::config::ClusterConfig;
use flagbench_core::{
    constants::{
        REDIS_CLUSTER_DIAL_TIMEOUT_VAR, REDIS_CLUSTER_HOSTS_VAR, REDIS_CLUSTER_IDLE_TIMEOUT_VAR,
        REDIS_CLUSTER_PASSWORD_VAR, REDIS_CLUSTER_POOL_TIMEOUT_VAR, REDIS_CLUSTER_READ_TIMEOUT_VAR,
        REDIS_CLUSTER_USERNAME_VAR, REDIS_CLUSTER_WRITE_TIMEOUT_VAR,
    },
    Error, Result,
};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Load `.env` from the working directory (or a parent) into the process
///
/// Returns the path that was loaded, or `None` when no file exists.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenv::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "Loaded environment file");
            Ok(Some(path))
        }
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!("No .env file found, using process environment only");
            Ok(None)
        }
        Err(e) => Err(Error::configuration(format!(
            "failed to read .env file: {e}"
        ))),
    }
}

/// Configuration loader that resolves cluster settings at startup
pub struct ConfigLoader {
    /// Whether to read a `.env` file before consulting the environment
    dotenv: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { dotenv: true }
    }

    /// Enable or disable `.env` loading
    pub fn dotenv(mut self, enabled: bool) -> Self {
        self.dotenv = enabled;
        self
    }

    /// Load cluster settings from the process environment
    pub fn load(self) -> Result<ClusterConfig> {
        if self.dotenv {
            load_dotenv()?;
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build cluster settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<ClusterConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_hosts = lookup(REDIS_CLUSTER_HOSTS_VAR)
            .ok_or_else(|| Error::environment(REDIS_CLUSTER_HOSTS_VAR, "not set"))?;
        let hosts = parse_hosts(&raw_hosts)?;

        let username = lookup(REDIS_CLUSTER_USERNAME_VAR).filter(|v| !v.is_empty());
        let password = lookup(REDIS_CLUSTER_PASSWORD_VAR).filter(|v| !v.is_empty());

        let mut config = ClusterConfig::new(hosts).with_credentials(username, password);

        if let Some(timeout) = millis(&lookup, REDIS_CLUSTER_DIAL_TIMEOUT_VAR)? {
            config.dial_timeout = timeout;
        }
        if let Some(timeout) = millis(&lookup, REDIS_CLUSTER_READ_TIMEOUT_VAR)? {
            config.read_timeout = timeout;
        }
        if let Some(timeout) = millis(&lookup, REDIS_CLUSTER_WRITE_TIMEOUT_VAR)? {
            config.write_timeout = timeout;
        }
        if let Some(timeout) = millis(&lookup, REDIS_CLUSTER_POOL_TIMEOUT_VAR)? {
            config.pool_timeout = timeout;
        }
        if let Some(timeout) = millis(&lookup, REDIS_CLUSTER_IDLE_TIMEOUT_VAR)? {
            config.idle_timeout = timeout;
        }

        debug!(hosts = config.hosts.len(), "Resolved cluster configuration");
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_hosts(raw: &str) -> Result<Vec<String>> {
    let hosts: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect();

    if hosts.is_empty() {
        return Err(Error::configuration(format!(
            "{REDIS_CLUSTER_HOSTS_VAR} does not list any host"
        )));
    }
    Ok(hosts)
}

fn millis<F>(lookup: &F, variable: &str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| Error::environment(variable, format!("expected milliseconds, got '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_minimal_environment() {
        let config =
            ConfigLoader::from_lookup(lookup_from(&[(REDIS_CLUSTER_HOSTS_VAR, "10.0.0.1:7000")]))
                .unwrap();
        assert_eq!(config.hosts, vec!["10.0.0.1:7000"]);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert_eq!(config.read_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_hosts_are_split_and_trimmed() {
        let config = ConfigLoader::from_lookup(lookup_from(&[(
            REDIS_CLUSTER_HOSTS_VAR,
            "a:7000, b:7001 ,,c:7002",
        )]))
        .unwrap();
        assert_eq!(config.hosts, vec!["a:7000", "b:7001", "c:7002"]);
    }

    #[test]
    fn test_missing_hosts() {
        let err = ConfigLoader::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Environment { ref variable, .. } if variable == REDIS_CLUSTER_HOSTS_VAR));
    }

    #[test]
    fn test_blank_hosts() {
        let err =
            ConfigLoader::from_lookup(lookup_from(&[(REDIS_CLUSTER_HOSTS_VAR, " , ")])).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_credentials_and_timeouts() {
        let config = ConfigLoader::from_lookup(lookup_from(&[
            (REDIS_CLUSTER_HOSTS_VAR, "a:7000"),
            (REDIS_CLUSTER_USERNAME_VAR, "reader"),
            (REDIS_CLUSTER_PASSWORD_VAR, "s3cret"),
            (REDIS_CLUSTER_DIAL_TIMEOUT_VAR, "250"),
            (REDIS_CLUSTER_READ_TIMEOUT_VAR, "40"),
        ]))
        .unwrap();
        assert_eq!(config.username.as_deref(), Some("reader"));
        assert_eq!(config.password.as_deref().map(String::as_str), Some("s3cret"));
        assert_eq!(config.dial_timeout, Duration::from_millis(250));
        assert_eq!(config.read_timeout, Duration::from_millis(40));
        assert_eq!(config.write_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_empty_credentials_are_ignored() {
        let config = ConfigLoader::from_lookup(lookup_from(&[
            (REDIS_CLUSTER_HOSTS_VAR, "a:7000"),
            (REDIS_CLUSTER_USERNAME_VAR, ""),
            (REDIS_CLUSTER_PASSWORD_VAR, ""),
        ]))
        .unwrap();
        assert!(config.username.is_none());
        assert!(config.password.is_none());
    }

    #[test]
    fn test_bad_timeout() {
        let err = ConfigLoader::from_lookup(lookup_from(&[
            (REDIS_CLUSTER_HOSTS_VAR, "a:7000"),
            (REDIS_CLUSTER_WRITE_TIMEOUT_VAR, "1s"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(REDIS_CLUSTER_WRITE_TIMEOUT_VAR));
    }
}
