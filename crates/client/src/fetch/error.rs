//! Fetch client error types.

use std::sync::Arc;

/// Errors from the HTTP fetch client.
///
/// Deliberately narrow: HTTP error statuses are not errors here. Callers
/// get the real response back and decide what an unacceptable status means
/// for them.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request timed out before a complete response arrived.
    #[error("request timeout")]
    Timeout,

    /// Connection, DNS, TLS, or protocol failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The underlying HTTP client could not be constructed.
    #[error("client build failed: {0}")]
    Build(Arc<reqwest::Error>),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { FetchError::Timeout } else { FetchError::Network(Arc::new(err)) }
    }
}
