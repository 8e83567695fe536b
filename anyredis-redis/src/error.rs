//! Error types for the redis-rs adapter.

use anyredis_core::RedisError;

/// Error raised while constructing the adapter.
///
/// Operation failures are mapped straight into [`RedisError`] with a
/// message naming the failed operation; this enum only appears when the
/// connection URL is invalid or the initial connection cannot be
/// established.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying `redis` client.
    #[error("Redis client error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl From<Error> for RedisError {
    fn from(error: Error) -> Self {
        match error {
            Error::Redis(source) => {
                RedisError::connection(format!("Redis client error: {source}"), source)
            }
        }
    }
}
