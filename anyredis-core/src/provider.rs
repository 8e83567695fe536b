//! Backend selector resolved once by the factory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RedisError;

/// The three supported client stacks.
///
/// Resolved from [`RedisConfig::provider`] by the factory, case-insensitively.
/// After construction no further string dispatch happens — each adapter knows
/// its own variant.
///
/// [`RedisConfig::provider`]: crate::RedisConfig::provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// `redis` crate with a shared multiplexed `ConnectionManager`.
    RedisRs,
    /// `deadpool-redis` connection pool, one borrow per call.
    Deadpool,
    /// `bb8` + `bb8-redis` connection pool, one borrow per call.
    Bb8,
}

impl Provider {
    /// All supported variants, in factory dispatch order.
    pub const ALL: [Provider; 3] = [Provider::RedisRs, Provider::Deadpool, Provider::Bb8];

    /// Canonical lowercase name of this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::RedisRs => "redis-rs",
            Provider::Deadpool => "deadpool",
            Provider::Bb8 => "bb8",
        }
    }

    /// Case-insensitive parse. Unknown names fail with the
    /// [`configuration`](crate::RedisError::configuration) error kind.
    pub fn parse(name: &str) -> Result<Self, RedisError> {
        match name.to_ascii_lowercase().as_str() {
            "redis-rs" => Ok(Provider::RedisRs),
            "deadpool" => Ok(Provider::Deadpool),
            "bb8" => Ok(Provider::Bb8),
            _ => Err(RedisError::configuration(format!(
                "Unsupported Redis provider: {name}"
            ))),
        }
    }
}

impl FromStr for Provider {
    type Err = RedisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::parse(s)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CODE_CONFIGURATION;

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(Provider::parse("redis-rs").unwrap(), Provider::RedisRs);
        assert_eq!(Provider::parse("deadpool").unwrap(), Provider::Deadpool);
        assert_eq!(Provider::parse("bb8").unwrap(), Provider::Bb8);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Provider::parse("Redis-RS").unwrap(), Provider::RedisRs);
        assert_eq!(Provider::parse("DEADPOOL").unwrap(), Provider::Deadpool);
        assert_eq!(Provider::parse("Bb8").unwrap(), Provider::Bb8);
    }

    #[test]
    fn test_parse_unknown_fails_with_configuration_code() {
        for name in ["jedis", "memcached", ""] {
            let err = Provider::parse(name).unwrap_err();
            assert!(err.has_code(CODE_CONFIGURATION), "name: {name:?}");
        }
    }

    #[test]
    fn test_roundtrip_display() {
        for provider in Provider::ALL {
            assert_eq!(Provider::parse(provider.as_str()).unwrap(), provider);
        }
    }
}
