//! Operation semantics exercised against the in-memory mock.

use std::collections::HashMap;
use std::time::Duration;

use anyredis::{RedisService, TimeUnit};
use anyredis_core::error::CODE_SHUTDOWN;
use anyredis_test::MockService;

#[tokio::test]
async fn string_lifecycle() {
    let service = MockService::new();

    service.set("k", "v").await.unwrap();
    assert_eq!(service.get("k").await.unwrap().as_deref(), Some("v"));
    assert!(service.exists("k").await.unwrap());
    assert!(service.delete("k").await.unwrap());
    assert_eq!(service.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn delete_nonexistent_returns_false() {
    let service = MockService::new();
    assert!(!service.delete("missing").await.unwrap());
}

#[tokio::test]
async fn delete_many_counts_only_existing_keys() {
    let service = MockService::new();
    service.set("a", "1").await.unwrap();
    service.set("b", "2").await.unwrap();

    let removed = service.delete_many(&["a", "b", "c"]).await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(service.delete_many(&[]).await.unwrap(), 0);
}

#[tokio::test]
async fn hash_set_all_roundtrip() {
    let service = MockService::new();
    let entries: HashMap<String, String> = [("a", "1"), ("b", "2")]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

    service.hash_set_all("h", &entries).await.unwrap();
    assert_eq!(service.hash_get_all("h").await.unwrap(), entries);
    assert_eq!(
        service.hash_get("h", "a").await.unwrap().as_deref(),
        Some("1")
    );
    assert_eq!(service.hash_get("h", "zz").await.unwrap(), None);
}

#[tokio::test]
async fn list_range_full_returns_insertion_order() {
    let service = MockService::new();
    for value in ["a", "b", "c"] {
        service.list_push_right("l", value).await.unwrap();
    }
    let length = service.list_push_left("l", "x").await.unwrap();
    assert_eq!(length, 4);

    let full = service.list_range("l", 0, -1).await.unwrap();
    assert_eq!(full, vec!["x", "a", "b", "c"]);

    let middle = service.list_range("l", 1, 2).await.unwrap();
    assert_eq!(middle, vec!["a", "b"]);

    let tail = service.list_range("l", -2, -1).await.unwrap();
    assert_eq!(tail, vec!["b", "c"]);

    let empty = service.list_range("l", 5, 9).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn set_add_counts_new_members_only() {
    let service = MockService::new();
    assert_eq!(service.set_add("s", &["a", "b"]).await.unwrap(), 2);
    assert_eq!(service.set_add("s", &["b", "c"]).await.unwrap(), 1);

    let members = service.set_members("s").await.unwrap();
    assert_eq!(members.len(), 3);
    assert!(members.contains("a") && members.contains("b") && members.contains("c"));
}

#[tokio::test]
async fn expire_then_ttl_stays_within_requested_duration() {
    let service = MockService::new();
    service.set("k", "v").await.unwrap();
    assert!(service.expire("k", Duration::from_secs(10)).await.unwrap());

    let secs = service.ttl("k", TimeUnit::Seconds).await.unwrap();
    assert!(secs > 0 && secs <= 10, "seconds ttl: {secs}");

    let millis = service.ttl("k", TimeUnit::Milliseconds).await.unwrap();
    assert!(millis > 0 && millis <= 10_000, "millis ttl: {millis}");
}

#[tokio::test]
async fn expire_on_missing_key_returns_false() {
    let service = MockService::new();
    assert!(!service.expire("missing", Duration::from_secs(5)).await.unwrap());
}

#[tokio::test]
async fn ttl_sentinels_pass_through_unconverted() {
    let service = MockService::new();

    // Key exists without expiry: -1 in any unit.
    service.set("persistent", "v").await.unwrap();
    assert_eq!(service.ttl("persistent", TimeUnit::Seconds).await.unwrap(), -1);
    assert_eq!(
        service.ttl("persistent", TimeUnit::Milliseconds).await.unwrap(),
        -1
    );

    // Absent key: -2 in any unit.
    assert_eq!(service.ttl("missing", TimeUnit::Seconds).await.unwrap(), -2);
    assert_eq!(service.ttl("missing", TimeUnit::Milliseconds).await.unwrap(), -2);
}

#[tokio::test]
async fn set_with_ttl_expires_the_key() {
    let service = MockService::new();
    service
        .set_with_ttl("ephemeral", "v", Duration::from_millis(20))
        .await
        .unwrap();
    assert!(service.exists("ephemeral").await.unwrap());

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(!service.exists("ephemeral").await.unwrap());
    assert_eq!(service.get("ephemeral").await.unwrap(), None);
    assert_eq!(service.ttl("ephemeral", TimeUnit::Seconds).await.unwrap(), -2);
}

#[tokio::test]
async fn plain_set_discards_previous_expiry() {
    let service = MockService::new();
    service
        .set_with_ttl("k", "old", Duration::from_secs(10))
        .await
        .unwrap();
    service.set("k", "new").await.unwrap();
    assert_eq!(service.ttl("k", TimeUnit::Seconds).await.unwrap(), -1);
}

#[tokio::test]
async fn operations_after_shutdown_fail() {
    let service = MockService::new();
    service.set("k", "v").await.unwrap();
    service.shutdown().await.unwrap();

    let err = service.get("k").await.unwrap_err();
    assert!(err.has_code(CODE_SHUTDOWN));

    let err = service.shutdown().await.unwrap_err();
    assert!(err.has_code(CODE_SHUTDOWN));
}

#[tokio::test]
async fn wrong_type_operations_fail() {
    let service = MockService::new();
    service.set("k", "v").await.unwrap();

    let err = service.list_push_left("k", "x").await.unwrap_err();
    assert!(err.message().contains("wrong kind of value"));
}
