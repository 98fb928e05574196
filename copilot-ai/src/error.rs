//! Error types for capability providers.

use std::fmt;

/// Universal error type that abstracts provider-specific errors into common variants.
///
/// All provider implementations map their native errors to these variants,
/// preserving context while maintaining a provider-agnostic interface. Callers
/// decide on retry behavior via [`Error::is_transient`] instead of matching on
/// provider internals.
#[derive(Debug)]
pub enum Error {
    /// API key or token authentication failures. Credentials are invalid,
    /// expired, or lack the necessary permissions.
    Authentication(String),

    /// Network connectivity issues, DNS failures, or connection resets.
    /// Transient; callers may retry with backoff.
    Network(String),

    /// Provider rate limit exceeded. Callers must wait before retrying.
    RateLimited { retry_after_seconds: u64 },

    /// Operation exceeded the configured or provider-enforced timeout.
    /// Transient; callers may retry with backoff.
    Timeout(String),

    /// Requested resource (transcript, task, project) does not exist.
    NotFound(String),

    /// Provider-level rejection of an otherwise well-formed request
    /// (e.g. content refused, invalid model). Not retryable.
    Provider(String),

    /// Invalid parameters, missing required fields, or malformed
    /// configuration. Indicates a programming or deployment error.
    Configuration(String),

    /// Failed to serialize a request payload.
    Serialization(String),

    /// Failed to deserialize a provider response to the expected type.
    Deserialization(String),

    /// Catch-all for errors that don't fit other categories.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Whether the error is expected to clear on its own, making a bounded
    /// retry with backoff worthwhile.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::RateLimited { .. } | Error::Timeout(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::RateLimited {
                retry_after_seconds,
            } => {
                write!(f, "Rate limited: retry after {}s", retry_after_seconds)
            }
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::Other(err) => write!(f, "Other error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(Error::Network("connection reset".to_string()).is_transient());
        assert!(Error::RateLimited {
            retry_after_seconds: 30
        }
        .is_transient());
        assert!(Error::Timeout("deadline exceeded".to_string()).is_transient());
    }

    #[test]
    fn fatal_errors_are_not_retryable() {
        assert!(!Error::NotFound("transcript abc".to_string()).is_transient());
        assert!(!Error::Provider("model refused".to_string()).is_transient());
        assert!(!Error::Configuration("missing api key".to_string()).is_transient());
        assert!(!Error::Authentication("expired token".to_string()).is_transient());
    }
}
