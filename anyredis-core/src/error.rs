//! The single error kind every service failure surfaces as.

use smol_str::SmolStr;
use std::error::Error as StdError;
use thiserror::Error;

/// Error code attached to failures raised by the factory for bad configuration.
pub const CODE_CONFIGURATION: &str = "configuration";

/// Error code attached to failures caused by network interaction.
pub const CODE_CONNECTION: &str = "connection";

/// Error code attached to operations invoked after [`shutdown`].
///
/// [`shutdown`]: crate::RedisService::shutdown
pub const CODE_SHUTDOWN: &str = "shutdown";

/// Uniform error for every service operation and for construction.
///
/// Carries an optional machine-readable code, a human-readable message, and
/// optionally the original client-library error as its [`source`]. Backend
/// adapters convert their library's native errors into this kind; callers
/// never see a backend-specific error type.
///
/// No operation is retried internally — every failure propagates to the
/// caller, who decides whether to retry, fail, or degrade.
///
/// [`source`]: std::error::Error::source
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RedisError {
    code: Option<SmolStr>,
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl RedisError {
    /// Error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Error with a machine-readable code and a message.
    pub fn with_code(code: impl Into<SmolStr>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            source: None,
        }
    }

    /// Operation failure wrapping the original client-library error.
    pub fn operation(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            code: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Network failure wrapping the original client-library error.
    pub fn connection(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            code: Some(SmolStr::new_static(CODE_CONNECTION)),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Construction-time configuration failure (unrecognized provider name).
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            code: Some(SmolStr::new_static(CODE_CONFIGURATION)),
            message: message.into(),
            source: None,
        }
    }

    /// Failure for an operation invoked after the service was shut down.
    pub fn shut_down() -> Self {
        Self {
            code: Some(SmolStr::new_static(CODE_SHUTDOWN)),
            message: "service has been shut down".to_owned(),
            source: None,
        }
    }

    /// The machine-readable code, if one was attached.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True if this error carries the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Underlying;

    #[test]
    fn test_message_display() {
        let err = RedisError::new("Failed to set value");
        assert_eq!(err.to_string(), "Failed to set value");
        assert!(err.code().is_none());
    }

    #[test]
    fn test_configuration_code() {
        let err = RedisError::configuration("Unsupported Redis provider: memcached");
        assert!(err.has_code(CODE_CONFIGURATION));
        assert!(err.message().contains("memcached"));
    }

    #[test]
    fn test_source_preserved() {
        let err = RedisError::operation("Failed to get value: boom", Underlying);
        let source = err.source().expect("source should be preserved");
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_shut_down_code() {
        assert!(RedisError::shut_down().has_code(CODE_SHUTDOWN));
    }
}
