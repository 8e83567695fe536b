#![warn(missing_docs)]
//! anyredis adapter over `bb8` + `bb8-redis`.
//!
//! Like the deadpool adapter, every operation borrows a pooled connection
//! for the duration of the call. See [`Bb8Service`].

mod error;
mod service;

pub use error::Error;
pub use service::Bb8Service;
