//! Call-interception decorator adding latency and failure logging.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use anyredis_core::{OpResult, Provider, RedisService, TimeUnit};
use async_trait::async_trait;
use tracing::{error, trace, warn};

/// Elapsed time above which a completed operation is logged at warn level.
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(100);

/// Transparent decorator that times every operation.
///
/// Implements the exact same operation set as the wrapped service: around
/// each call it records the start instant, awaits the inner operation, and
/// emits a diagnostic record tagged with the operation name and elapsed
/// milliseconds — `warn!` above the slow threshold, `trace!` below it. A
/// failed call is logged at `error!` with the error message and the
/// original error is returned unchanged.
///
/// The decorator adds no error kinds, never swallows a failure, and never
/// turns a success into a failure; wrapped and unwrapped handles are
/// behaviorally identical.
pub struct ObservedService<S> {
    inner: S,
    slow_threshold: Duration,
}

impl<S: RedisService> ObservedService<S> {
    /// Wraps a service with the default 100 ms slow threshold.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }

    /// Adjusts the elapsed-time threshold for warn-level records.
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Borrows the wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwraps the decorator.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn observe<T>(
        &self,
        operation: &'static str,
        started: Instant,
        result: OpResult<T>,
    ) -> OpResult<T> {
        match &result {
            Ok(_) => {
                let elapsed = started.elapsed();
                if elapsed > self.slow_threshold {
                    warn!(
                        operation,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "slow redis operation"
                    );
                } else {
                    trace!(
                        operation,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "redis operation completed"
                    );
                }
            }
            Err(err) => {
                error!(operation, error = %err, "redis operation failed");
            }
        }
        result
    }
}

#[async_trait]
impl<S: RedisService> RedisService for ObservedService<S> {
    async fn set(&self, key: &str, value: &str) -> OpResult<()> {
        let started = Instant::now();
        let result = self.inner.set(key, value).await;
        self.observe("set", started, result)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> OpResult<()> {
        let started = Instant::now();
        let result = self.inner.set_with_ttl(key, value, ttl).await;
        self.observe("set_with_ttl", started, result)
    }

    async fn get(&self, key: &str) -> OpResult<Option<String>> {
        let started = Instant::now();
        let result = self.inner.get(key).await;
        self.observe("get", started, result)
    }

    async fn delete(&self, key: &str) -> OpResult<bool> {
        let started = Instant::now();
        let result = self.inner.delete(key).await;
        self.observe("delete", started, result)
    }

    async fn delete_many(&self, keys: &[&str]) -> OpResult<u64> {
        let started = Instant::now();
        let result = self.inner.delete_many(keys).await;
        self.observe("delete_many", started, result)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> OpResult<bool> {
        let started = Instant::now();
        let result = self.inner.expire(key, ttl).await;
        self.observe("expire", started, result)
    }

    async fn exists(&self, key: &str) -> OpResult<bool> {
        let started = Instant::now();
        let result = self.inner.exists(key).await;
        self.observe("exists", started, result)
    }

    async fn ttl(&self, key: &str, unit: TimeUnit) -> OpResult<i64> {
        let started = Instant::now();
        let result = self.inner.ttl(key, unit).await;
        self.observe("ttl", started, result)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> OpResult<()> {
        let started = Instant::now();
        let result = self.inner.hash_set(key, field, value).await;
        self.observe("hash_set", started, result)
    }

    async fn hash_get(&self, key: &str, field: &str) -> OpResult<Option<String>> {
        let started = Instant::now();
        let result = self.inner.hash_get(key, field).await;
        self.observe("hash_get", started, result)
    }

    async fn hash_set_all(&self, key: &str, entries: &HashMap<String, String>) -> OpResult<()> {
        let started = Instant::now();
        let result = self.inner.hash_set_all(key, entries).await;
        self.observe("hash_set_all", started, result)
    }

    async fn hash_get_all(&self, key: &str) -> OpResult<HashMap<String, String>> {
        let started = Instant::now();
        let result = self.inner.hash_get_all(key).await;
        self.observe("hash_get_all", started, result)
    }

    async fn list_push_left(&self, key: &str, value: &str) -> OpResult<u64> {
        let started = Instant::now();
        let result = self.inner.list_push_left(key, value).await;
        self.observe("list_push_left", started, result)
    }

    async fn list_push_right(&self, key: &str, value: &str) -> OpResult<u64> {
        let started = Instant::now();
        let result = self.inner.list_push_right(key, value).await;
        self.observe("list_push_right", started, result)
    }

    async fn list_range(&self, key: &str, start: i64, end: i64) -> OpResult<Vec<String>> {
        let started = Instant::now();
        let result = self.inner.list_range(key, start, end).await;
        self.observe("list_range", started, result)
    }

    async fn set_add(&self, key: &str, values: &[&str]) -> OpResult<u64> {
        let started = Instant::now();
        let result = self.inner.set_add(key, values).await;
        self.observe("set_add", started, result)
    }

    async fn set_members(&self, key: &str) -> OpResult<HashSet<String>> {
        let started = Instant::now();
        let result = self.inner.set_members(key).await;
        self.observe("set_members", started, result)
    }

    fn provider(&self) -> Provider {
        self.inner.provider()
    }

    async fn shutdown(&self) -> OpResult<()> {
        let started = Instant::now();
        let result = self.inner.shutdown().await;
        self.observe("shutdown", started, result)
    }
}
