//! Live three-backend tests against a containerized Redis.
//!
//! These spin up a real server via testcontainers, so they are ignored by
//! default; run them with `cargo test -- --ignored` on a machine with a
//! Docker daemon.

use std::collections::HashMap;
use std::time::Duration;

use anyredis::{RedisConfig, RedisService, TimeUnit, create_observed_service, create_service};
use testcontainers_modules::{redis::Redis, testcontainers::runners::AsyncRunner};

async fn start_redis() -> (
    testcontainers_modules::testcontainers::ContainerAsync<Redis>,
    RedisConfig,
) {
    let container = Redis::default().start().await.expect("start redis container");
    let port = container
        .get_host_port_ipv4(6379)
        .await
        .expect("resolve mapped port");
    let config = RedisConfig::new("127.0.0.1", port);
    (container, config)
}

/// The full uniform operation set, against whatever adapter is passed in.
async fn exercise(service: &dyn RedisService, prefix: &str) {
    let k = |name: &str| format!("{prefix}:{name}");

    // Strings.
    service.set(&k("k"), "v").await.unwrap();
    assert_eq!(service.get(&k("k")).await.unwrap().as_deref(), Some("v"));
    assert!(service.exists(&k("k")).await.unwrap());
    assert!(service.delete(&k("k")).await.unwrap());
    assert_eq!(service.get(&k("k")).await.unwrap(), None);
    assert!(!service.delete(&k("k")).await.unwrap());

    // Expiry.
    service.set(&k("e"), "v").await.unwrap();
    assert!(service.expire(&k("e"), Duration::from_secs(10)).await.unwrap());
    let secs = service.ttl(&k("e"), TimeUnit::Seconds).await.unwrap();
    assert!(secs > 0 && secs <= 10, "ttl secs: {secs}");
    let millis = service.ttl(&k("e"), TimeUnit::Milliseconds).await.unwrap();
    assert!(millis > 0 && millis <= 10_000, "ttl millis: {millis}");

    service.set(&k("plain"), "v").await.unwrap();
    assert_eq!(service.ttl(&k("plain"), TimeUnit::Seconds).await.unwrap(), -1);
    assert_eq!(service.ttl(&k("absent"), TimeUnit::Seconds).await.unwrap(), -2);

    service
        .set_with_ttl(&k("st"), "v", Duration::from_secs(5))
        .await
        .unwrap();
    let st_ttl = service.ttl(&k("st"), TimeUnit::Seconds).await.unwrap();
    assert!(st_ttl > 0 && st_ttl <= 5, "set_with_ttl ttl: {st_ttl}");

    // Bulk delete.
    service.set(&k("d1"), "1").await.unwrap();
    service.set(&k("d2"), "2").await.unwrap();
    let removed = service
        .delete_many(&[&k("d1"), &k("d2"), &k("d3")])
        .await
        .unwrap();
    assert_eq!(removed, 2);

    // Hashes.
    service.hash_set(&k("h"), "f", "1").await.unwrap();
    assert_eq!(
        service.hash_get(&k("h"), "f").await.unwrap().as_deref(),
        Some("1")
    );
    let entries: HashMap<String, String> =
        [("a".to_owned(), "1".to_owned()), ("b".to_owned(), "2".to_owned())].into();
    service.hash_set_all(&k("h2"), &entries).await.unwrap();
    assert_eq!(service.hash_get_all(&k("h2")).await.unwrap(), entries);

    // Lists.
    assert_eq!(service.list_push_right(&k("l"), "a").await.unwrap(), 1);
    assert_eq!(service.list_push_right(&k("l"), "b").await.unwrap(), 2);
    assert_eq!(service.list_push_left(&k("l"), "x").await.unwrap(), 3);
    assert_eq!(
        service.list_range(&k("l"), 0, -1).await.unwrap(),
        vec!["x", "a", "b"]
    );

    // Sets.
    assert_eq!(service.set_add(&k("s"), &["a", "b"]).await.unwrap(), 2);
    assert_eq!(service.set_add(&k("s"), &["b", "c"]).await.unwrap(), 1);
    let members = service.set_members(&k("s")).await.unwrap();
    assert_eq!(members.len(), 3);
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn redis_rs_adapter_full_operation_set() {
    let (_container, config) = start_redis().await;
    let service = create_service(&config.with_provider("redis-rs")).await.unwrap();
    exercise(&*service, "redisrs").await;
    service.shutdown().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn deadpool_adapter_full_operation_set() {
    let (_container, config) = start_redis().await;
    let service = create_service(&config.with_provider("deadpool")).await.unwrap();
    exercise(&*service, "deadpool").await;
    service.shutdown().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn bb8_adapter_full_operation_set() {
    let (_container, config) = start_redis().await;
    let service = create_service(&config.with_provider("bb8")).await.unwrap();
    exercise(&*service, "bb8").await;
    service.shutdown().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn list_range_agrees_across_all_backends() {
    let (_container, config) = start_redis().await;

    for provider in ["redis-rs", "deadpool", "bb8"] {
        let service = create_service(&config.clone().with_provider(provider))
            .await
            .unwrap();
        let key = format!("agree:{provider}");
        for value in ["1", "2", "3"] {
            service.list_push_right(&key, value).await.unwrap();
        }
        assert_eq!(
            service.list_range(&key, 0, -1).await.unwrap(),
            vec!["1", "2", "3"],
            "provider: {provider}"
        );
        service.shutdown().await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn observed_service_behaves_identically_live() {
    let (_container, config) = start_redis().await;

    let plain = create_service(&config.clone().with_provider("redis-rs"))
        .await
        .unwrap();
    let observed = create_observed_service(&config.with_provider("redis-rs"))
        .await
        .unwrap();

    plain.set("obs:plain", "v").await.unwrap();
    observed.set("obs:wrapped", "v").await.unwrap();
    assert_eq!(
        plain.get("obs:plain").await.unwrap(),
        observed.get("obs:wrapped").await.unwrap()
    );

    plain.shutdown().await.unwrap();
    observed.shutdown().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn operations_after_shutdown_fail_live() {
    use anyredis_core::error::CODE_SHUTDOWN;

    let (_container, config) = start_redis().await;

    for provider in ["redis-rs", "bb8"] {
        let service = create_service(&config.clone().with_provider(provider))
            .await
            .unwrap();
        service.shutdown().await.unwrap();
        let err = service.get("k").await.unwrap_err();
        assert!(err.has_code(CODE_SHUTDOWN), "provider: {provider}");
    }
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn unreachable_server_fails_at_construction() {
    // Nothing listens on this port; every adapter must fail eagerly.
    let config = RedisConfig::new("127.0.0.1", 1)
        .with_connect_timeout(Duration::from_millis(200));

    for provider in ["redis-rs", "deadpool", "bb8"] {
        let result = create_service(&config.clone().with_provider(provider)).await;
        assert!(result.is_err(), "provider: {provider}");
    }
}
