#![warn(missing_docs)]
//! # anyredis
//!
//! One operation interface over three Redis client stacks, chosen at
//! configuration time.
//!
//! Build a [`RedisConfig`], hand it to [`create_service`], and call the
//! uniform [`RedisService`] operations — string, hash, list, and set
//! commands — without caring which client library carries them. Wrap the
//! handle in [`ObservedService`] (or use [`create_observed_service`]) to
//! get per-call latency logging for free.
//!
//! ```no_run
//! use anyredis::{RedisConfig, create_observed_service};
//! use anyredis::RedisService as _;
//!
//! # async fn example() -> Result<(), anyredis::RedisError> {
//! let config = RedisConfig::default().with_provider("deadpool");
//! let service = create_observed_service(&config).await?;
//!
//! service.set("greeting", "hello").await?;
//! assert_eq!(service.get("greeting").await?.as_deref(), Some("hello"));
//!
//! service.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod factory;
mod observe;

pub use anyredis_bb8::Bb8Service;
pub use anyredis_core::{OpResult, Provider, RedisConfig, RedisError, RedisService, TimeUnit};
pub use anyredis_deadpool::DeadpoolService;
pub use anyredis_redis::RedisRsService;
pub use factory::{create_observed_service, create_service};
pub use observe::{DEFAULT_SLOW_THRESHOLD, ObservedService};
