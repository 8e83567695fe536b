#![warn(missing_docs)]
//! anyredis adapter over `deadpool-redis`.
//!
//! Every operation borrows a connection from the pool for the duration of
//! the call and returns it on drop, on every exit path. See
//! [`DeadpoolService`].

mod error;
mod service;

pub use error::Error;
pub use service::DeadpoolService;
