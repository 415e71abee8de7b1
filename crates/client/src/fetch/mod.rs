//! HTTP fetch pipeline behind the agent's network boundary.
//!
//! ### Behavior
//! - Transport failures (DNS, connect, TLS, timeout) are errors; every HTTP
//!   status, including 4xx/5xx, comes back as an ordinary response so the
//!   caller owns cache policy.
//! - Redirects are followed up to a limit and the final URL is reported,
//!   letting callers tell where a response actually came from.
//! - No implicit timeout: one is applied only when configured.

pub mod error;
pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, Method, StatusCode, header};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use error::FetchError;
pub use url::{UrlError, resolve, same_origin};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "pantry/0.1")
    pub user_agent: String,

    /// Request timeout; None leaves timing out to the transport (default)
    pub timeout: Option<Duration>,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "pantry/0.1".to_string(), timeout: None, max_redirects: 5 }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The original URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: header::HeaderMap,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Network boundary the agent fetches through.
///
/// Implemented by [`FetchClient`] for real traffic and by fakes in tests.
#[async_trait::async_trait]
pub trait Network: Send + Sync {
    /// Perform a request, following redirects.
    async fn fetch(&self, method: Method, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// HTTP fetch client.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|e| FetchError::Build(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Network for FetchClient {
    async fn fetch(&self, method: Method, url: &Url) -> Result<FetchResponse, FetchError> {
        let start = Instant::now();
        let mut url = url.clone();
        url.set_fragment(None);

        let response = self.http.request(method, url.clone()).send().await?;

        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} status {} in {}ms ({} bytes)",
            url,
            final_url,
            status.as_u16(),
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse { url, final_url, status, headers, bytes, fetch_ms })
    }
}
