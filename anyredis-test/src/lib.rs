//! Test support for anyredis: an in-memory [`MockService`] implementing
//! the full uniform operation set, plus the integration tests under
//! `tests/`.

pub mod mock;

pub use mock::MockService;
