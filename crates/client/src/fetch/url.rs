//! URL resolution against the agent's origin.

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty reference")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a path or URL reference against an origin.
///
/// Relative references ("./index.html", "styles.css", "/manifest.json")
/// resolve the way a document served from the origin would resolve them,
/// so an origin with a base path keeps its scope. Absolute http(s) URLs
/// pass through. Fragments are dropped so resolved URLs are stable as
/// cache keys.
pub fn resolve(origin: &url::Url, reference: &str) -> Result<url::Url, UrlError> {
    let trimmed = reference.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut resolved = origin.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match resolved.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    resolved.set_fragment(None);

    Ok(resolved)
}

/// Whether two URLs share an origin (scheme, host, and port).
pub fn same_origin(a: &url::Url, b: &url::Url) -> bool {
    a.origin() == b.origin()
}
