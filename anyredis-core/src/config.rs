//! Connection configuration shared by all backend adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "localhost".to_owned()
}

fn default_port() -> u16 {
    6379
}

fn default_timeout() -> Duration {
    Duration::from_millis(3000)
}

fn default_max_connections() -> u32 {
    8
}

fn default_provider() -> String {
    "redis-rs".to_owned()
}

/// Connection parameters for a Redis service.
///
/// A plain data holder with sensible defaults (localhost:6379, no password,
/// database 0, 3 second timeouts, 8 connections, TLS off). The config is
/// handed to an adapter at construction time and never mutated afterwards;
/// it carries no identity beyond its field values.
///
/// No validation happens here — the factory rejects unrecognized provider
/// names, everything else is passed through to the client library.
///
/// # Examples
///
/// ```
/// use anyredis_core::RedisConfig;
///
/// let config = RedisConfig::default()
///     .with_host("redis.internal")
///     .with_port(6380)
///     .with_password("secret")
///     .with_provider("deadpool");
///
/// assert_eq!(config.connection_url(), "redis://:secret@redis.internal:6380/0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis server host name or address.
    pub host: String,
    /// Redis server port.
    pub port: u16,
    /// Password for AUTH; empty string means no authentication.
    pub password: String,
    /// Logical database index selected after connecting.
    pub database: i64,
    /// Timeout for establishing a connection.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Timeout for a single command round-trip, where the backend supports it.
    #[serde(with = "humantime_serde")]
    pub operation_timeout: Duration,
    /// Upper bound on pooled connections, where the backend pools.
    pub max_connections: u32,
    /// Connect over TLS (`rediss://`).
    pub use_tls: bool,
    /// Backend selector, matched case-insensitively by the factory.
    pub provider: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: String::new(),
            database: 0,
            connect_timeout: default_timeout(),
            operation_timeout: default_timeout(),
            max_connections: default_max_connections(),
            use_tls: false,
            provider: default_provider(),
        }
    }
}

impl RedisConfig {
    /// Config pointing at `host:port` with all other fields defaulted.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets the server host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the server port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the AUTH password. An empty string disables authentication.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the logical database index.
    pub fn with_database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }

    /// Sets the connection establishment timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-command timeout, where the backend supports one.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Sets the pool size, where the backend pools connections.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Enables or disables TLS.
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Sets the backend selector string.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Builds the `redis://` (or `rediss://` under TLS) connection URL
    /// understood by all three client stacks.
    pub fn connection_url(&self) -> String {
        let scheme = if self.use_tls { "rediss" } else { "redis" };
        if self.password.is_empty() {
            format!(
                "{}://{}:{}/{}",
                scheme, self.host, self.port, self.database
            )
        } else {
            format!(
                "{}://:{}@{}:{}/{}",
                scheme, self.password, self.host, self.port, self.database
            )
        }
    }
}
