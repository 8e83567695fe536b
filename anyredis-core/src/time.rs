//! Unit handling for TTL queries.

use serde::{Deserialize, Serialize};

/// Unit in which a remaining TTL is reported.
///
/// Redis answers the `TTL` command in whole seconds; positive answers are
/// converted to the requested unit, non-positive sentinels pass through
/// unchanged (see [`RedisService::ttl`]).
///
/// [`RedisService::ttl`]: crate::RedisService::ttl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Whole seconds.
    Seconds,
    /// Whole milliseconds.
    Milliseconds,
}

impl TimeUnit {
    /// Converts a positive seconds count into this unit.
    ///
    /// Non-positive values are backend sentinels and must not be converted;
    /// callers are expected to pass them through untouched.
    pub fn from_secs(&self, secs: i64) -> i64 {
        match self {
            TimeUnit::Seconds => secs,
            TimeUnit::Milliseconds => secs.saturating_mul(1000),
        }
    }
}
