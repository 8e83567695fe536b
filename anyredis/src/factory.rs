//! One-shot construction of a service from a configuration.

use anyredis_bb8::Bb8Service;
use anyredis_core::{Provider, RedisConfig, RedisError, RedisService};
use anyredis_deadpool::DeadpoolService;
use anyredis_redis::RedisRsService;
use tracing::debug;

use crate::observe::ObservedService;

/// Constructs the adapter named by `config.provider`.
///
/// The provider name is matched case-insensitively against the supported
/// set (`redis-rs`, `deadpool`, `bb8`); anything else fails with the
/// `configuration` error code before any network activity. Construction
/// opens the live connection or pool eagerly, so an unreachable server
/// also fails here rather than on first use. No retry — one shot.
pub async fn create_service(config: &RedisConfig) -> Result<Box<dyn RedisService>, RedisError> {
    let provider = Provider::parse(&config.provider)?;
    let service: Box<dyn RedisService> = match provider {
        Provider::RedisRs => Box::new(RedisRsService::connect(config).await?),
        Provider::Deadpool => Box::new(DeadpoolService::connect(config).await?),
        Provider::Bb8 => Box::new(Bb8Service::connect(config).await?),
    };
    debug!(provider = %provider, "created redis service");
    Ok(service)
}

/// [`create_service`] plus the [`ObservedService`] decorator in one call.
pub async fn create_observed_service(
    config: &RedisConfig,
) -> Result<ObservedService<Box<dyn RedisService>>, RedisError> {
    Ok(ObservedService::new(create_service(config).await?))
}
