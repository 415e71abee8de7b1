//! Responses the agent serves back to the host.

use bytes::Bytes;
use pantry_client::{FetchResponse, HeaderMap, Method};
use pantry_core::StoredResponse;

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeSource {
    /// Found in a cache store.
    Cache,
    /// Fetched from the network just now.
    Network,
    /// Offline: the cached fallback document stood in for a navigation.
    DocumentFallback,
    /// Offline: synthesized placeholder response.
    OfflinePlaceholder,
}

/// A response in the shape the host hands back to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl ServedResponse {
    /// The synthetic response served when offline with nothing cached.
    pub fn offline_placeholder() -> Self {
        Self {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: Bytes::from_static(b"Offline"),
        }
    }

    /// View of a cached snapshot.
    pub fn from_stored(stored: &StoredResponse) -> Self {
        Self {
            status: stored.status,
            status_text: stored.status_text.clone(),
            headers: stored.headers.clone(),
            body: Bytes::from(stored.body.clone()),
        }
    }

    /// View of a network response.
    pub fn from_fetch(fetched: &FetchResponse) -> Self {
        Self {
            status: fetched.status.as_u16(),
            status_text: fetched.status.canonical_reason().unwrap_or("").to_string(),
            headers: header_pairs(&fetched.headers),
            body: fetched.bytes.clone(),
        }
    }
}

/// Snapshot of a network response in storable form.
///
/// Keyed by the request URL, not the final URL: a cached redirect target
/// must answer for the URL that was asked for.
pub fn stored_from_fetch(method: &Method, fetched: &FetchResponse) -> StoredResponse {
    StoredResponse {
        method: method.to_string(),
        url: fetched.url.to_string(),
        status: fetched.status.as_u16(),
        status_text: fetched.status.canonical_reason().unwrap_or("").to_string(),
        headers: header_pairs(&fetched.headers),
        body: fetched.bytes.to_vec(),
        stored_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_client::StatusCode;
    use url::Url;

    #[test]
    fn test_offline_placeholder_contract() {
        let response = ServedResponse::offline_placeholder();
        assert_eq!(response.status, 503);
        assert_eq!(response.status_text, "Service Unavailable");
        assert_eq!(response.headers, vec![("Content-Type".to_string(), "text/plain".to_string())]);
        assert_eq!(response.body, Bytes::from_static(b"Offline"));
    }

    #[test]
    fn test_from_stored_roundtrip() {
        let stored = StoredResponse {
            method: "GET".to_string(),
            url: "http://localhost:8080/styles.css".to_string(),
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("content-type".to_string(), "text/css".to_string())],
            body: b"body { margin: 0 }".to_vec(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        };

        let served = ServedResponse::from_stored(&stored);
        assert_eq!(served.status, 200);
        assert_eq!(served.headers, stored.headers);
        assert_eq!(served.body, Bytes::from(stored.body.clone()));
    }

    #[test]
    fn test_stored_from_fetch_keyed_by_request_url() {
        let fetched = FetchResponse {
            url: Url::parse("http://localhost:8080/script.js").unwrap(),
            final_url: Url::parse("http://localhost:8080/assets/script.v2.js").unwrap(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            bytes: Bytes::from_static(b"console.log('hi')"),
            fetch_ms: 3,
        };

        let stored = stored_from_fetch(&Method::GET, &fetched);
        assert_eq!(stored.url, "http://localhost:8080/script.js");
        assert_eq!(stored.status, 200);
        assert_eq!(stored.status_text, "OK");
        assert_eq!(stored.body, b"console.log('hi')".to_vec());
    }
}
