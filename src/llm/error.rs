use thiserror::Error;

/// Boxed error passed through the retry loop untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a [`super::ChatTransport`] for a single attempt.
///
/// The retry loop branches on the variant, never on message text.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The upstream asked us to slow down (HTTP 429).
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The request never reached the upstream, or the exchange was cut short.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Generic upstream or server-side failure (5xx class).
    #[error("API error: {0}")]
    Api(String),

    /// The upstream rejected this request permanently.
    #[error("{0}")]
    Unrecoverable(String),

    /// Anything the transport could not classify.
    #[error(transparent)]
    Unexpected(BoxError),
}

/// Error raised by [`super::CompletionClient::create_chat_completion`].
///
/// Transient failures never show up here: once retries are exhausted the
/// client returns `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unrecoverable error when calling the language model API: {0}")]
    Unrecoverable(String),

    #[error(transparent)]
    Unexpected(BoxError),
}

impl CompletionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CompletionError::InvalidArgument(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_is_transparent() {
        let inner: BoxError = "socket exploded".into();
        let err = CompletionError::Unexpected(inner);
        assert_eq!(err.to_string(), "socket exploded");
    }

    #[test]
    fn test_unrecoverable_wraps_message() {
        let err = CompletionError::Unrecoverable("HTTP 401: bad key".to_string());
        assert_eq!(
            err.to_string(),
            "Unrecoverable error when calling the language model API: HTTP 401: bad key"
        );
    }

    #[test]
    fn test_transport_error_display() {
        assert!(
            TransportError::RateLimited("slow down".to_string())
                .to_string()
                .contains("Rate limit")
        );
        assert_eq!(
            TransportError::Unrecoverable("HTTP 400: nope".to_string()).to_string(),
            "HTTP 400: nope"
        );
    }
}
