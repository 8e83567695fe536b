#![warn(missing_docs)]
//! # anyredis-core
//!
//! Core traits and types for the anyredis uniform Redis service abstraction.
//!
//! This crate defines everything a backend adapter crate needs to implement:
//!
//! - [`RedisService`] — the uniform operation set (strings, hashes, lists, sets)
//! - [`RedisConfig`] — connection parameters shared by all adapters
//! - [`RedisError`] — the single error kind every failure surfaces as
//! - [`Provider`] — the backend selector resolved by the factory
//!
//! Backend adapters live in their own crates (`anyredis-redis`,
//! `anyredis-deadpool`, `anyredis-bb8`); the factory and the observability
//! decorator live in the `anyredis` facade crate.

pub mod config;
pub mod error;
pub mod provider;
pub mod service;
pub mod time;

pub use config::RedisConfig;
pub use error::RedisError;
pub use provider::Provider;
pub use service::{OpResult, RedisService};
pub use time::TimeUnit;
