//! bb8-redis service implementation.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;

use anyredis_core::{OpResult, Provider, RedisConfig, RedisError, RedisService, TimeUnit};
use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{self, Pool};
use bb8_redis::redis::{self, AsyncCommands};
use tracing::info;

use crate::error::Error;

type RedisPool = Pool<RedisConnectionManager>;

/// Redis service backed by a [`bb8::Pool`] of multiplexed connections.
///
/// The pool is sized by [`RedisConfig::max_connections`] and borrowing is
/// bounded by the connect timeout. Each operation takes one connection out
/// of the pool and returns it on drop, success or failure alike.
///
/// [`RedisConfig::max_connections`]: anyredis_core::RedisConfig::max_connections
pub struct Bb8Service {
    pool: RwLock<Option<RedisPool>>,
}

impl Bb8Service {
    /// Builds the pool and verifies connectivity with a `PING`.
    pub async fn connect(config: &RedisConfig) -> Result<Self, RedisError> {
        let manager =
            RedisConnectionManager::new(config.connection_url()).map_err(Error::from)?;
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(config.connect_timeout)
            .build(manager)
            .await
            .map_err(Error::from)?;

        {
            let mut con = pool.get().await.map_err(Error::from)?;
            let _: String = redis::cmd("PING")
                .query_async(&mut *con)
                .await
                .map_err(Error::from)?;
        }

        info!(
            host = %config.host,
            port = config.port,
            pool_size = config.max_connections,
            "initialized bb8 service"
        );
        Ok(Self {
            pool: RwLock::new(Some(pool)),
        })
    }

    /// Clones the pool handle, failing if the service was shut down.
    fn pool(&self) -> OpResult<RedisPool> {
        let guard = match self.pool.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone().ok_or_else(RedisError::shut_down)
    }
}

fn wrap(message: &'static str) -> impl FnOnce(redis::RedisError) -> RedisError {
    move |source| RedisError::operation(format!("{message}: {source}"), source)
}

fn pool_err(source: bb8::RunError<redis::RedisError>) -> RedisError {
    RedisError::from(Error::Pool(source))
}

#[async_trait]
impl RedisService for Bb8Service {
    async fn set(&self, key: &str, value: &str) -> OpResult<()> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.set(key, value).await.map_err(wrap("Failed to set value"))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> OpResult<()> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.set_ex(key, value, ttl.as_secs())
            .await
            .map_err(wrap("Failed to set value with expiration"))
    }

    async fn get(&self, key: &str) -> OpResult<Option<String>> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.get(key).await.map_err(wrap("Failed to get value"))
    }

    async fn delete(&self, key: &str) -> OpResult<bool> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        let removed: i64 = con.del(key).await.map_err(wrap("Failed to delete key"))?;
        Ok(removed > 0)
    }

    async fn delete_many(&self, keys: &[&str]) -> OpResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        let removed: i64 = con.del(keys).await.map_err(wrap("Failed to delete keys"))?;
        Ok(removed as u64)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> OpResult<bool> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.expire(key, ttl.as_secs() as i64)
            .await
            .map_err(wrap("Failed to set expiration"))
    }

    async fn exists(&self, key: &str) -> OpResult<bool> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.exists(key)
            .await
            .map_err(wrap("Failed to check key existence"))
    }

    async fn ttl(&self, key: &str, unit: TimeUnit) -> OpResult<i64> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        let secs: i64 = con.ttl(key).await.map_err(wrap("Failed to get expiration"))?;
        Ok(if secs > 0 { unit.from_secs(secs) } else { secs })
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> OpResult<()> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.hset(key, field, value)
            .await
            .map_err(wrap("Failed to set hash field"))
    }

    async fn hash_get(&self, key: &str, field: &str) -> OpResult<Option<String>> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.hget(key, field)
            .await
            .map_err(wrap("Failed to get hash field"))
    }

    async fn hash_set_all(&self, key: &str, entries: &HashMap<String, String>) -> OpResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        let items: Vec<(&String, &String)> = entries.iter().collect();
        con.hset_multiple(key, &items)
            .await
            .map_err(wrap("Failed to set all hash fields"))
    }

    async fn hash_get_all(&self, key: &str) -> OpResult<HashMap<String, String>> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.hgetall(key)
            .await
            .map_err(wrap("Failed to get all hash fields"))
    }

    async fn list_push_left(&self, key: &str, value: &str) -> OpResult<u64> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        let length: i64 = con
            .lpush(key, value)
            .await
            .map_err(wrap("Failed to push to list"))?;
        Ok(length as u64)
    }

    async fn list_push_right(&self, key: &str, value: &str) -> OpResult<u64> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        let length: i64 = con
            .rpush(key, value)
            .await
            .map_err(wrap("Failed to push to list"))?;
        Ok(length as u64)
    }

    async fn list_range(&self, key: &str, start: i64, end: i64) -> OpResult<Vec<String>> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.lrange(key, start as isize, end as isize)
            .await
            .map_err(wrap("Failed to get list range"))
    }

    async fn set_add(&self, key: &str, values: &[&str]) -> OpResult<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        let added: i64 = con
            .sadd(key, values)
            .await
            .map_err(wrap("Failed to add to set"))?;
        Ok(added as u64)
    }

    async fn set_members(&self, key: &str) -> OpResult<HashSet<String>> {
        let pool = self.pool()?;
        let mut con = pool.get().await.map_err(pool_err)?;
        con.smembers(key)
            .await
            .map_err(wrap("Failed to get set members"))
    }

    fn provider(&self) -> Provider {
        Provider::Bb8
    }

    async fn shutdown(&self) -> OpResult<()> {
        let mut guard = match self.pool.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.take() {
            Some(pool) => {
                // Dropping the pool closes its idle connections; borrowed
                // ones close as callers return them.
                drop(pool);
                info!("shut down bb8 service");
                Ok(())
            }
            None => Err(RedisError::shut_down()),
        }
    }
}
