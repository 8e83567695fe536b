//! The uniform operation set implemented by every backend adapter.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Provider, RedisError, TimeUnit};

/// Result alias for service operations.
pub type OpResult<T> = Result<T, RedisError>;

/// Uniform Redis operation set, identical across the three client stacks.
///
/// One live instance exists per configuration, owning exactly one
/// connection or pool from the chosen client library. Instances hold no
/// mutable per-call state and are safe to share across concurrent callers;
/// thread-safety of the wire traffic is delegated to the client library.
///
/// Every operation awaits the remote round-trip and surfaces any failure as
/// [`RedisError`], preserving the library's error as the source. Nothing is
/// retried internally.
///
/// # Shutdown
///
/// [`shutdown`](RedisService::shutdown) must be invoked exactly once by the
/// owner before the handle is discarded; releasing network resources is
/// never left to drop timing. Operations issued after shutdown fail with
/// the [`shutdown`](crate::error::CODE_SHUTDOWN) error code. Callers must
/// quiesce concurrent use before shutting down.
///
/// # TTL semantics
///
/// [`ttl`](RedisService::ttl) reports the remaining expiry via the Redis
/// `TTL` command on every adapter, so the sentinel convention is uniform:
/// `-1` means the key exists without an expiry, `-2` means the key is
/// absent. Positive answers are converted from seconds into the requested
/// [`TimeUnit`]; sentinels pass through unchanged.
#[async_trait]
pub trait RedisService: Send + Sync {
    /// Stores a string value.
    async fn set(&self, key: &str, value: &str) -> OpResult<()>;

    /// Stores a string value with an expiry.
    ///
    /// The duration is converted to the unit the backend command expects
    /// (whole seconds for `SETEX`, milliseconds for `SET PX`), truncating.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> OpResult<()>;

    /// Fetches a string value, `None` if the key is absent.
    async fn get(&self, key: &str) -> OpResult<Option<String>>;

    /// Deletes one key. Returns whether the key existed.
    async fn delete(&self, key: &str) -> OpResult<bool>;

    /// Deletes several keys. Returns how many actually existed and were removed.
    async fn delete_many(&self, keys: &[&str]) -> OpResult<u64>;

    /// Sets an expiry on a key, truncated to whole seconds.
    /// Returns whether the key existed and the expiry was set.
    async fn expire(&self, key: &str, ttl: Duration) -> OpResult<bool>;

    /// Whether the key exists.
    async fn exists(&self, key: &str) -> OpResult<bool>;

    /// Remaining TTL of a key in the requested unit.
    ///
    /// Positive: remaining time. `-1`: no expiry. `-2`: key absent.
    async fn ttl(&self, key: &str, unit: TimeUnit) -> OpResult<i64>;

    /// Sets a single hash field.
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> OpResult<()>;

    /// Fetches a single hash field, `None` if the field or key is absent.
    async fn hash_get(&self, key: &str, field: &str) -> OpResult<Option<String>>;

    /// Sets several hash fields at once.
    async fn hash_set_all(&self, key: &str, entries: &HashMap<String, String>) -> OpResult<()>;

    /// Fetches all fields of a hash. Empty map if the key is absent.
    async fn hash_get_all(&self, key: &str) -> OpResult<HashMap<String, String>>;

    /// Prepends a value to a list. Returns the new list length.
    async fn list_push_left(&self, key: &str, value: &str) -> OpResult<u64>;

    /// Appends a value to a list. Returns the new list length.
    async fn list_push_right(&self, key: &str, value: &str) -> OpResult<u64>;

    /// Fetches a list slice in insertion order.
    ///
    /// Native `LRANGE` indexing: both ends inclusive, negative indices
    /// count from the tail, so `end == -1` means "to the end of the list".
    async fn list_range(&self, key: &str, start: i64, end: i64) -> OpResult<Vec<String>>;

    /// Adds values to a set. Returns how many were not already members.
    async fn set_add(&self, key: &str, values: &[&str]) -> OpResult<u64>;

    /// Fetches all members of a set. Empty set if the key is absent.
    async fn set_members(&self, key: &str) -> OpResult<HashSet<String>>;

    /// Which client stack backs this handle.
    fn provider(&self) -> Provider;

    /// Releases the underlying connection or pool.
    ///
    /// Must be called exactly once by the owner; see the trait-level docs.
    async fn shutdown(&self) -> OpResult<()>;
}

macro_rules! forward_redis_service {
    ($wrapper:ty) => {
        #[async_trait]
        impl RedisService for $wrapper {
            async fn set(&self, key: &str, value: &str) -> OpResult<()> {
                (**self).set(key, value).await
            }

            async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> OpResult<()> {
                (**self).set_with_ttl(key, value, ttl).await
            }

            async fn get(&self, key: &str) -> OpResult<Option<String>> {
                (**self).get(key).await
            }

            async fn delete(&self, key: &str) -> OpResult<bool> {
                (**self).delete(key).await
            }

            async fn delete_many(&self, keys: &[&str]) -> OpResult<u64> {
                (**self).delete_many(keys).await
            }

            async fn expire(&self, key: &str, ttl: Duration) -> OpResult<bool> {
                (**self).expire(key, ttl).await
            }

            async fn exists(&self, key: &str) -> OpResult<bool> {
                (**self).exists(key).await
            }

            async fn ttl(&self, key: &str, unit: TimeUnit) -> OpResult<i64> {
                (**self).ttl(key, unit).await
            }

            async fn hash_set(&self, key: &str, field: &str, value: &str) -> OpResult<()> {
                (**self).hash_set(key, field, value).await
            }

            async fn hash_get(&self, key: &str, field: &str) -> OpResult<Option<String>> {
                (**self).hash_get(key, field).await
            }

            async fn hash_set_all(
                &self,
                key: &str,
                entries: &HashMap<String, String>,
            ) -> OpResult<()> {
                (**self).hash_set_all(key, entries).await
            }

            async fn hash_get_all(&self, key: &str) -> OpResult<HashMap<String, String>> {
                (**self).hash_get_all(key).await
            }

            async fn list_push_left(&self, key: &str, value: &str) -> OpResult<u64> {
                (**self).list_push_left(key, value).await
            }

            async fn list_push_right(&self, key: &str, value: &str) -> OpResult<u64> {
                (**self).list_push_right(key, value).await
            }

            async fn list_range(&self, key: &str, start: i64, end: i64) -> OpResult<Vec<String>> {
                (**self).list_range(key, start, end).await
            }

            async fn set_add(&self, key: &str, values: &[&str]) -> OpResult<u64> {
                (**self).set_add(key, values).await
            }

            async fn set_members(&self, key: &str) -> OpResult<HashSet<String>> {
                (**self).set_members(key).await
            }

            fn provider(&self) -> Provider {
                (**self).provider()
            }

            async fn shutdown(&self) -> OpResult<()> {
                (**self).shutdown().await
            }
        }
    };
}

forward_redis_service!(Box<dyn RedisService>);
forward_redis_service!(Arc<dyn RedisService>);
