//! Error types for the bb8 adapter.

use anyredis_core::RedisError;
use bb8_redis::{bb8, redis};

/// Errors from the pool machinery and the wrapped client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying `redis` client.
    #[error("Redis client error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Borrowing a connection from the pool failed or timed out.
    #[error("Redis pool error: {0}")]
    Pool(#[from] bb8::RunError<redis::RedisError>),
}

impl From<Error> for RedisError {
    fn from(error: Error) -> Self {
        RedisError::connection(error.to_string(), error)
    }
}
