//! Intercepted request descriptions.

use pantry_client::Method;
use url::Url;

/// What kind of resource a request targets, as the host understands it.
///
/// Only `Document` changes agent behavior (navigations get the cached
/// fallback document when offline); the rest are carried for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Document,
    Style,
    Script,
    Image,
    Font,
    Manifest,
    Other,
}

/// A request the host intercepted and handed to the agent.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub destination: Destination,
}

impl FetchRequest {
    /// A plain GET for a subresource.
    pub fn get(url: Url) -> Self {
        Self::with_destination(Method::GET, url, Destination::Other)
    }

    /// A navigation request for a document.
    pub fn navigation(url: Url) -> Self {
        Self::with_destination(Method::GET, url, Destination::Document)
    }

    /// A request with an explicit method and destination.
    ///
    /// The URL fragment is dropped up front; fragments never reach the
    /// network and would split cache keys.
    pub fn with_destination(method: Method, url: Url, destination: Destination) -> Self {
        let mut url = url;
        url.set_fragment(None);
        Self { method, url, destination }
    }

    /// Whether the agent handles this request at all.
    ///
    /// Non-GET methods and extension-scheme URLs pass through untouched.
    pub fn is_intercepted(&self) -> bool {
        self.method == Method::GET && self.url.scheme() != "chrome-extension"
    }

    /// Whether this is a navigation to a document.
    pub fn is_navigation(&self) -> bool {
        self.destination == Destination::Document
    }
}
