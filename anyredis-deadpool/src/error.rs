//! Error types for the deadpool adapter.

use anyredis_core::RedisError;
use deadpool_redis::{CreatePoolError, PoolError};

/// Errors from the pool machinery and the wrapped client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Pool construction failed (bad URL or pool configuration).
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(#[from] CreatePoolError),

    /// Borrowing a connection from the pool failed.
    #[error("Redis pool error: {0}")]
    Pool(#[from] PoolError),

    /// An error from the underlying `redis` client.
    #[error("Redis client error: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),
}

impl From<Error> for RedisError {
    fn from(error: Error) -> Self {
        match error {
            // A closed pool means the owner already shut the service down.
            Error::Pool(PoolError::Closed) => RedisError::shut_down(),
            other => RedisError::connection(other.to_string(), other),
        }
    }
}
