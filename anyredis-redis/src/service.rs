//! redis-rs service implementation.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;

use anyredis_core::{OpResult, Provider, RedisConfig, RedisError, RedisService, TimeUnit};
use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::info;

use crate::error::Error;

/// Redis service backed by the `redis` crate's [`ConnectionManager`].
///
/// The manager is a single multiplexed connection shared by all callers;
/// each operation clones a handle to it, which is cheap. Because there is
/// no pool, [`RedisConfig::max_connections`] does not apply to this
/// adapter and is ignored.
///
/// Connect and response timeouts from the config are baked into the
/// manager at construction time.
///
/// [`ConnectionManager`]: redis::aio::ConnectionManager
/// [`RedisConfig::max_connections`]: anyredis_core::RedisConfig::max_connections
pub struct RedisRsService {
    connection: RwLock<Option<ConnectionManager>>,
}

impl RedisRsService {
    /// Opens the multiplexed connection and verifies it with a `PING`.
    ///
    /// Fails immediately if the server is unreachable; readiness is never
    /// deferred to the first operation.
    pub async fn connect(config: &RedisConfig) -> Result<Self, RedisError> {
        let client = Client::open(config.connection_url()).map_err(Error::from)?;
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Some(config.connect_timeout))
            .set_response_timeout(Some(config.operation_timeout));
        let mut manager = client
            .get_connection_manager_with_config(manager_config)
            .await
            .map_err(Error::from)?;

        let _: String = redis::cmd("PING")
            .query_async(&mut manager)
            .await
            .map_err(Error::from)?;

        info!(
            host = %config.host,
            port = config.port,
            "initialized redis-rs service"
        );
        Ok(Self {
            connection: RwLock::new(Some(manager)),
        })
    }

    /// Clones the shared manager, failing if the service was shut down.
    fn connection(&self) -> OpResult<ConnectionManager> {
        let guard = match self.connection.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone().ok_or_else(RedisError::shut_down)
    }
}

fn wrap(message: &'static str) -> impl FnOnce(redis::RedisError) -> RedisError {
    move |source| RedisError::operation(format!("{message}: {source}"), source)
}

#[async_trait]
impl RedisService for RedisRsService {
    async fn set(&self, key: &str, value: &str) -> OpResult<()> {
        let mut con = self.connection()?;
        con.set(key, value).await.map_err(wrap("Failed to set value"))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> OpResult<()> {
        let mut con = self.connection()?;
        con.set_ex(key, value, ttl.as_secs())
            .await
            .map_err(wrap("Failed to set value with expiration"))
    }

    async fn get(&self, key: &str) -> OpResult<Option<String>> {
        let mut con = self.connection()?;
        con.get(key).await.map_err(wrap("Failed to get value"))
    }

    async fn delete(&self, key: &str) -> OpResult<bool> {
        let mut con = self.connection()?;
        let removed: i64 = con.del(key).await.map_err(wrap("Failed to delete key"))?;
        Ok(removed > 0)
    }

    async fn delete_many(&self, keys: &[&str]) -> OpResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut con = self.connection()?;
        let removed: i64 = con.del(keys).await.map_err(wrap("Failed to delete keys"))?;
        Ok(removed as u64)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> OpResult<bool> {
        let mut con = self.connection()?;
        con.expire(key, ttl.as_secs() as i64)
            .await
            .map_err(wrap("Failed to set expiration"))
    }

    async fn exists(&self, key: &str) -> OpResult<bool> {
        let mut con = self.connection()?;
        con.exists(key)
            .await
            .map_err(wrap("Failed to check key existence"))
    }

    async fn ttl(&self, key: &str, unit: TimeUnit) -> OpResult<i64> {
        let mut con = self.connection()?;
        let secs: i64 = con.ttl(key).await.map_err(wrap("Failed to get expiration"))?;
        // Non-positive answers are sentinels and pass through unchanged.
        Ok(if secs > 0 { unit.from_secs(secs) } else { secs })
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> OpResult<()> {
        let mut con = self.connection()?;
        con.hset(key, field, value)
            .await
            .map_err(wrap("Failed to set hash field"))
    }

    async fn hash_get(&self, key: &str, field: &str) -> OpResult<Option<String>> {
        let mut con = self.connection()?;
        con.hget(key, field)
            .await
            .map_err(wrap("Failed to get hash field"))
    }

    async fn hash_set_all(&self, key: &str, entries: &HashMap<String, String>) -> OpResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut con = self.connection()?;
        let items: Vec<(&String, &String)> = entries.iter().collect();
        con.hset_multiple(key, &items)
            .await
            .map_err(wrap("Failed to set all hash fields"))
    }

    async fn hash_get_all(&self, key: &str) -> OpResult<HashMap<String, String>> {
        let mut con = self.connection()?;
        con.hgetall(key)
            .await
            .map_err(wrap("Failed to get all hash fields"))
    }

    async fn list_push_left(&self, key: &str, value: &str) -> OpResult<u64> {
        let mut con = self.connection()?;
        let length: i64 = con
            .lpush(key, value)
            .await
            .map_err(wrap("Failed to push to list"))?;
        Ok(length as u64)
    }

    async fn list_push_right(&self, key: &str, value: &str) -> OpResult<u64> {
        let mut con = self.connection()?;
        let length: i64 = con
            .rpush(key, value)
            .await
            .map_err(wrap("Failed to push to list"))?;
        Ok(length as u64)
    }

    async fn list_range(&self, key: &str, start: i64, end: i64) -> OpResult<Vec<String>> {
        let mut con = self.connection()?;
        con.lrange(key, start as isize, end as isize)
            .await
            .map_err(wrap("Failed to get list range"))
    }

    async fn set_add(&self, key: &str, values: &[&str]) -> OpResult<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let mut con = self.connection()?;
        let added: i64 = con
            .sadd(key, values)
            .await
            .map_err(wrap("Failed to add to set"))?;
        Ok(added as u64)
    }

    async fn set_members(&self, key: &str) -> OpResult<HashSet<String>> {
        let mut con = self.connection()?;
        con.smembers(key)
            .await
            .map_err(wrap("Failed to get set members"))
    }

    fn provider(&self) -> Provider {
        Provider::RedisRs
    }

    async fn shutdown(&self) -> OpResult<()> {
        let mut guard = match self.connection.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.take() {
            Some(manager) => {
                // Dropping the manager closes the multiplexed connection.
                drop(manager);
                info!("shut down redis-rs service");
                Ok(())
            }
            None => Err(RedisError::shut_down()),
        }
    }
}
