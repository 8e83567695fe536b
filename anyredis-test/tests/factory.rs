//! Factory dispatch behavior that needs no running server.

use anyredis::{Provider, RedisConfig, create_service};
use anyredis_core::error::CODE_CONFIGURATION;

#[tokio::test]
async fn unknown_provider_fails_with_configuration_error() {
    let config = RedisConfig::default().with_provider("memcached");
    let err = create_service(&config).await.err().expect("must not construct");
    assert!(err.has_code(CODE_CONFIGURATION));
    assert!(err.message().contains("memcached"));
}

#[tokio::test]
async fn empty_provider_fails_with_configuration_error() {
    let config = RedisConfig::default().with_provider("");
    let err = create_service(&config).await.err().expect("must not construct");
    assert!(err.has_code(CODE_CONFIGURATION));
}

#[tokio::test]
async fn original_java_provider_names_are_not_supported() {
    for name in ["jedis", "lettuce", "redisson"] {
        let config = RedisConfig::default().with_provider(name);
        let err = create_service(&config).await.err().expect("must not construct");
        assert!(err.has_code(CODE_CONFIGURATION), "name: {name}");
    }
}

#[test]
fn provider_names_parse_case_insensitively() {
    for provider in Provider::ALL {
        let upper = provider.as_str().to_uppercase();
        assert_eq!(Provider::parse(&upper).unwrap(), provider);
        assert_eq!(Provider::parse(provider.as_str()).unwrap(), provider);
    }
}

#[test]
fn configuration_failure_carries_no_source() {
    let err = Provider::parse("unknown-stack").unwrap_err();
    assert!(std::error::Error::source(&err).is_none());
}
