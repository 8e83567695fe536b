//! In-memory service used to test backend-independent behavior.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyredis_core::{OpResult, Provider, RedisError, RedisService, TimeUnit};
use async_trait::async_trait;
use dashmap::DashMap;

/// One stored value, mirroring the four Redis data kinds the uniform
/// operation set touches.
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Str(String),
    Hash(HashMap<String, String>),
    List(VecDeque<String>),
    Set(HashSet<String>),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Str(_) => "string",
            Entry::Hash(_) => "hash",
            Entry::List(_) => "list",
            Entry::Set(_) => "set",
        }
    }
}

#[derive(Debug, Clone)]
struct Stored {
    entry: Entry,
    expires_at: Option<Instant>,
}

impl Stored {
    fn new(entry: Entry) -> Self {
        Self {
            entry,
            expires_at: None,
        }
    }

    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= Instant::now())
    }
}

fn wrong_type(expected: &'static str, found: &'static str) -> RedisError {
    RedisError::new(format!(
        "Operation against a key holding the wrong kind of value (expected {expected}, found {found})"
    ))
}

/// In-memory [`RedisService`] with real expiry bookkeeping.
///
/// Backend-independent properties (factory dispatch aside) are tested
/// against this instead of a live server: the string/hash/list/set
/// operations behave like Redis does, including lazy expiry, `LRANGE`
/// negative indexing, and the `-1`/`-2` TTL sentinels.
///
/// [`MockService::failing`] builds a variant whose every operation fails,
/// for decorator passthrough tests.
pub struct MockService {
    data: DashMap<String, Stored>,
    calls: AtomicUsize,
    provider: Provider,
    fail_all: bool,
    shut_down: AtomicBool,
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockService {
    /// Empty mock reporting itself as the `redis-rs` variant.
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            calls: AtomicUsize::new(0),
            provider: Provider::RedisRs,
            fail_all: false,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Mock that reports itself as the given provider variant.
    pub fn with_provider(provider: Provider) -> Self {
        Self {
            provider,
            ..Self::new()
        }
    }

    /// Mock whose every operation fails with a `mock` coded error.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::new()
        }
    }

    /// How many operations have been invoked, shutdown included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of live (non-expired) keys.
    pub fn key_count(&self) -> usize {
        self.data
            .iter()
            .filter(|entry| !entry.value().expired())
            .count()
    }

    /// Counts the call and enforces the failing/shut-down states.
    fn enter(&self, operation: &'static str) -> OpResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(RedisError::shut_down());
        }
        if self.fail_all {
            return Err(RedisError::with_code(
                "mock",
                format!("mock failure: {operation}"),
            ));
        }
        Ok(())
    }

    /// Drops the key if its expiry has passed, mirroring lazy expiry.
    fn evict_if_expired(&self, key: &str) {
        if let Some(stored) = self.data.get(key)
            && stored.expired()
        {
            drop(stored);
            self.data.remove(key);
        }
    }

    fn live_entry(&self, key: &str) -> Option<Entry> {
        self.evict_if_expired(key);
        self.data.get(key).map(|stored| stored.entry.clone())
    }
}

#[async_trait]
impl RedisService for MockService {
    async fn set(&self, key: &str, value: &str) -> OpResult<()> {
        self.enter("set")?;
        // SET discards any previous expiry, like Redis does.
        self.data
            .insert(key.to_owned(), Stored::new(Entry::Str(value.to_owned())));
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> OpResult<()> {
        self.enter("set_with_ttl")?;
        let mut stored = Stored::new(Entry::Str(value.to_owned()));
        stored.expires_at = Some(Instant::now() + ttl);
        self.data.insert(key.to_owned(), stored);
        Ok(())
    }

    async fn get(&self, key: &str) -> OpResult<Option<String>> {
        self.enter("get")?;
        match self.live_entry(key) {
            None => Ok(None),
            Some(Entry::Str(value)) => Ok(Some(value)),
            Some(other) => Err(wrong_type("string", other.kind())),
        }
    }

    async fn delete(&self, key: &str) -> OpResult<bool> {
        self.enter("delete")?;
        self.evict_if_expired(key);
        Ok(self.data.remove(key).is_some())
    }

    async fn delete_many(&self, keys: &[&str]) -> OpResult<u64> {
        self.enter("delete_many")?;
        let mut removed = 0;
        for key in keys {
            self.evict_if_expired(key);
            if self.data.remove(*key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> OpResult<bool> {
        self.enter("expire")?;
        self.evict_if_expired(key);
        match self.data.get_mut(key) {
            Some(mut stored) => {
                stored.expires_at = Some(Instant::now() + ttl);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, key: &str) -> OpResult<bool> {
        self.enter("exists")?;
        Ok(self.live_entry(key).is_some())
    }

    async fn ttl(&self, key: &str, unit: TimeUnit) -> OpResult<i64> {
        self.enter("ttl")?;
        self.evict_if_expired(key);
        let Some(stored) = self.data.get(key) else {
            return Ok(-2);
        };
        let Some(deadline) = stored.expires_at else {
            return Ok(-1);
        };
        // Round up, so a freshly set expiry never reads as zero.
        let remaining = deadline.saturating_duration_since(Instant::now());
        let secs = remaining.as_millis().div_ceil(1000) as i64;
        Ok(if secs > 0 { unit.from_secs(secs) } else { secs })
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> OpResult<()> {
        self.enter("hash_set")?;
        self.evict_if_expired(key);
        let mut stored = self
            .data
            .entry(key.to_owned())
            .or_insert_with(|| Stored::new(Entry::Hash(HashMap::new())));
        match &mut stored.entry {
            Entry::Hash(map) => {
                map.insert(field.to_owned(), value.to_owned());
                Ok(())
            }
            other => Err(wrong_type("hash", other.kind())),
        }
    }

    async fn hash_get(&self, key: &str, field: &str) -> OpResult<Option<String>> {
        self.enter("hash_get")?;
        match self.live_entry(key) {
            None => Ok(None),
            Some(Entry::Hash(map)) => Ok(map.get(field).cloned()),
            Some(other) => Err(wrong_type("hash", other.kind())),
        }
    }

    async fn hash_set_all(&self, key: &str, entries: &HashMap<String, String>) -> OpResult<()> {
        self.enter("hash_set_all")?;
        self.evict_if_expired(key);
        let mut stored = self
            .data
            .entry(key.to_owned())
            .or_insert_with(|| Stored::new(Entry::Hash(HashMap::new())));
        match &mut stored.entry {
            Entry::Hash(map) => {
                map.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
                Ok(())
            }
            other => Err(wrong_type("hash", other.kind())),
        }
    }

    async fn hash_get_all(&self, key: &str) -> OpResult<HashMap<String, String>> {
        self.enter("hash_get_all")?;
        match self.live_entry(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(map)) => Ok(map),
            Some(other) => Err(wrong_type("hash", other.kind())),
        }
    }

    async fn list_push_left(&self, key: &str, value: &str) -> OpResult<u64> {
        self.enter("list_push_left")?;
        self.evict_if_expired(key);
        let mut stored = self
            .data
            .entry(key.to_owned())
            .or_insert_with(|| Stored::new(Entry::List(VecDeque::new())));
        match &mut stored.entry {
            Entry::List(list) => {
                list.push_front(value.to_owned());
                Ok(list.len() as u64)
            }
            other => Err(wrong_type("list", other.kind())),
        }
    }

    async fn list_push_right(&self, key: &str, value: &str) -> OpResult<u64> {
        self.enter("list_push_right")?;
        self.evict_if_expired(key);
        let mut stored = self
            .data
            .entry(key.to_owned())
            .or_insert_with(|| Stored::new(Entry::List(VecDeque::new())));
        match &mut stored.entry {
            Entry::List(list) => {
                list.push_back(value.to_owned());
                Ok(list.len() as u64)
            }
            other => Err(wrong_type("list", other.kind())),
        }
    }

    async fn list_range(&self, key: &str, start: i64, end: i64) -> OpResult<Vec<String>> {
        self.enter("list_range")?;
        let list = match self.live_entry(key) {
            None => return Ok(Vec::new()),
            Some(Entry::List(list)) => list,
            Some(other) => return Err(wrong_type("list", other.kind())),
        };

        // Native LRANGE indexing: inclusive ends, negatives count from the tail.
        let len = list.len() as i64;
        let resolve = |idx: i64| if idx < 0 { len + idx } else { idx };
        let start = resolve(start).max(0);
        let end = resolve(end).min(len - 1);
        if start > end || start >= len {
            return Ok(Vec::new());
        }
        Ok(list
            .iter()
            .skip(start as usize)
            .take((end - start + 1) as usize)
            .cloned()
            .collect())
    }

    async fn set_add(&self, key: &str, values: &[&str]) -> OpResult<u64> {
        self.enter("set_add")?;
        self.evict_if_expired(key);
        let mut stored = self
            .data
            .entry(key.to_owned())
            .or_insert_with(|| Stored::new(Entry::Set(HashSet::new())));
        match &mut stored.entry {
            Entry::Set(set) => {
                let mut added = 0;
                for value in values {
                    if set.insert((*value).to_owned()) {
                        added += 1;
                    }
                }
                Ok(added)
            }
            other => Err(wrong_type("set", other.kind())),
        }
    }

    async fn set_members(&self, key: &str) -> OpResult<HashSet<String>> {
        self.enter("set_members")?;
        match self.live_entry(key) {
            None => Ok(HashSet::new()),
            Some(Entry::Set(set)) => Ok(set),
            Some(other) => Err(wrong_type("set", other.kind())),
        }
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    async fn shutdown(&self) -> OpResult<()> {
        self.enter("shutdown")?;
        self.shut_down.store(true, Ordering::SeqCst);
        self.data.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_call_count_tracks_every_operation() {
        let service = MockService::new();
        service.set("a", "1").await.unwrap();
        service.get("a").await.unwrap();
        service.delete("a").await.unwrap();
        assert_eq!(service.call_count(), 3);

        // Failed calls count too.
        let failing = MockService::failing();
        failing.get("a").await.unwrap_err();
        assert_eq!(failing.call_count(), 1);
    }

    #[tokio::test]
    async fn test_key_count_skips_expired_entries() {
        let service = MockService::new();
        service.set("live", "v").await.unwrap();
        service
            .set_with_ttl("dead", "v", Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(service.key_count(), 1);
    }
}
