#![warn(missing_docs)]
//! anyredis adapter over the `redis` crate.
//!
//! Uses a single shared [`ConnectionManager`] — a multiplexed connection
//! that is cheap to clone per call — rather than a pool. See
//! [`RedisRsService`] for details.
//!
//! [`ConnectionManager`]: redis::aio::ConnectionManager

mod error;
mod service;

pub use error::Error;
pub use service::RedisRsService;
