/// Constants used throughout the flagbench codebase
use std::time::Duration;

// Cluster configuration environment variables
pub const REDIS_CLUSTER_HOSTS_VAR: &str = "REDIS_CLUSTER_HOSTS";
pub const REDIS_CLUSTER_USERNAME_VAR: &str = "REDIS_CLUSTER_USERNAME";
pub const REDIS_CLUSTER_PASSWORD_VAR: &str = "REDIS_CLUSTER_PASSWORD";
pub const REDIS_CLUSTER_DIAL_TIMEOUT_VAR: &str = "REDIS_CLUSTER_DIAL_TIMEOUT_MS";
pub const REDIS_CLUSTER_READ_TIMEOUT_VAR: &str = "REDIS_CLUSTER_READ_TIMEOUT_MS";
pub const REDIS_CLUSTER_WRITE_TIMEOUT_VAR: &str = "REDIS_CLUSTER_WRITE_TIMEOUT_MS";
pub const REDIS_CLUSTER_POOL_TIMEOUT_VAR: &str = "REDIS_CLUSTER_POOL_TIMEOUT_MS";
pub const REDIS_CLUSTER_IDLE_TIMEOUT_VAR: &str = "REDIS_CLUSTER_IDLE_TIMEOUT_MS";

// Logging
pub const FLAGBENCH_LOG_VAR: &str = "FLAGBENCH_LOG";

// Client timeouts
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_POOL_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

// Seeding
pub const DEFAULT_SEED_TTL: Duration = Duration::from_secs(5 * 60);

// Bounded fan-out worker count
pub const DEFAULT_CONCURRENCY: usize = 10;

// Generated key prefix
pub const DEFAULT_KEY_PREFIX: &str = "delivery";
