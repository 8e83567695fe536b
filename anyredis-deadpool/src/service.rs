//! deadpool-redis service implementation.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyredis_core::{OpResult, Provider, RedisConfig, RedisError, RedisService, TimeUnit};
use async_trait::async_trait;
use deadpool_redis::{Connection, Pool, PoolConfig, Runtime, redis, redis::AsyncCommands};
use tracing::info;

use crate::error::Error;

/// Redis service backed by a [`deadpool_redis::Pool`].
///
/// The pool is sized by [`RedisConfig::max_connections`]; creating and
/// waiting for a connection are both bounded by the connect timeout. Each
/// operation borrows one connection and releases it when the call returns,
/// whether it succeeded or failed.
///
/// Shutdown closes the pool in place; later borrows fail with the
/// `shutdown` error code.
///
/// [`RedisConfig::max_connections`]: anyredis_core::RedisConfig::max_connections
pub struct DeadpoolService {
    pool: Pool,
}

impl DeadpoolService {
    /// Creates the pool and verifies connectivity with a `PING`.
    pub async fn connect(config: &RedisConfig) -> Result<Self, RedisError> {
        let mut pool_config = PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.create = Some(config.connect_timeout);
        pool_config.timeouts.wait = Some(config.connect_timeout);

        let mut cfg = deadpool_redis::Config::from_url(config.connection_url());
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(Error::from)?;

        let mut con = pool.get().await.map_err(Error::from)?;
        let _: String = redis::cmd("PING")
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;
        drop(con);

        info!(
            host = %config.host,
            port = config.port,
            pool_size = config.max_connections,
            "initialized deadpool service"
        );
        Ok(Self { pool })
    }

    /// Borrows a pooled connection for one call.
    async fn connection(&self) -> OpResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(Error::Pool)
            .map_err(RedisError::from)
    }
}

fn wrap(message: &'static str) -> impl FnOnce(redis::RedisError) -> RedisError {
    move |source| RedisError::operation(format!("{message}: {source}"), source)
}

#[async_trait]
impl RedisService for DeadpoolService {
    async fn set(&self, key: &str, value: &str) -> OpResult<()> {
        let mut con = self.connection().await?;
        con.set(key, value).await.map_err(wrap("Failed to set value"))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> OpResult<()> {
        let mut con = self.connection().await?;
        // SET with PX keeps sub-second precision, like the expiry variant of
        // the other adapters' SETEX keeps whole seconds.
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async::<()>(&mut con)
            .await
            .map_err(wrap("Failed to set value with expiration"))
    }

    async fn get(&self, key: &str) -> OpResult<Option<String>> {
        let mut con = self.connection().await?;
        con.get(key).await.map_err(wrap("Failed to get value"))
    }

    async fn delete(&self, key: &str) -> OpResult<bool> {
        let mut con = self.connection().await?;
        let removed: i64 = con.del(key).await.map_err(wrap("Failed to delete key"))?;
        Ok(removed > 0)
    }

    async fn delete_many(&self, keys: &[&str]) -> OpResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut con = self.connection().await?;
        let removed: i64 = con.del(keys).await.map_err(wrap("Failed to delete keys"))?;
        Ok(removed as u64)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> OpResult<bool> {
        let mut con = self.connection().await?;
        con.expire(key, ttl.as_secs() as i64)
            .await
            .map_err(wrap("Failed to set expiration"))
    }

    async fn exists(&self, key: &str) -> OpResult<bool> {
        let mut con = self.connection().await?;
        con.exists(key)
            .await
            .map_err(wrap("Failed to check key existence"))
    }

    async fn ttl(&self, key: &str, unit: TimeUnit) -> OpResult<i64> {
        let mut con = self.connection().await?;
        let secs: i64 = con.ttl(key).await.map_err(wrap("Failed to get expiration"))?;
        Ok(if secs > 0 { unit.from_secs(secs) } else { secs })
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> OpResult<()> {
        let mut con = self.connection().await?;
        con.hset(key, field, value)
            .await
            .map_err(wrap("Failed to set hash field"))
    }

    async fn hash_get(&self, key: &str, field: &str) -> OpResult<Option<String>> {
        let mut con = self.connection().await?;
        con.hget(key, field)
            .await
            .map_err(wrap("Failed to get hash field"))
    }

    async fn hash_set_all(&self, key: &str, entries: &HashMap<String, String>) -> OpResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut con = self.connection().await?;
        let items: Vec<(&String, &String)> = entries.iter().collect();
        con.hset_multiple(key, &items)
            .await
            .map_err(wrap("Failed to set all hash fields"))
    }

    async fn hash_get_all(&self, key: &str) -> OpResult<HashMap<String, String>> {
        let mut con = self.connection().await?;
        con.hgetall(key)
            .await
            .map_err(wrap("Failed to get all hash fields"))
    }

    async fn list_push_left(&self, key: &str, value: &str) -> OpResult<u64> {
        let mut con = self.connection().await?;
        let length: i64 = con
            .lpush(key, value)
            .await
            .map_err(wrap("Failed to push to list"))?;
        Ok(length as u64)
    }

    async fn list_push_right(&self, key: &str, value: &str) -> OpResult<u64> {
        let mut con = self.connection().await?;
        let length: i64 = con
            .rpush(key, value)
            .await
            .map_err(wrap("Failed to push to list"))?;
        Ok(length as u64)
    }

    async fn list_range(&self, key: &str, start: i64, end: i64) -> OpResult<Vec<String>> {
        let mut con = self.connection().await?;
        con.lrange(key, start as isize, end as isize)
            .await
            .map_err(wrap("Failed to get list range"))
    }

    async fn set_add(&self, key: &str, values: &[&str]) -> OpResult<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let mut con = self.connection().await?;
        let added: i64 = con
            .sadd(key, values)
            .await
            .map_err(wrap("Failed to add to set"))?;
        Ok(added as u64)
    }

    async fn set_members(&self, key: &str) -> OpResult<HashSet<String>> {
        let mut con = self.connection().await?;
        con.smembers(key)
            .await
            .map_err(wrap("Failed to get set members"))
    }

    fn provider(&self) -> Provider {
        Provider::Deadpool
    }

    async fn shutdown(&self) -> OpResult<()> {
        if self.pool.is_closed() {
            return Err(RedisError::shut_down());
        }
        self.pool.close();
        info!("shut down deadpool service");
        Ok(())
    }
}
