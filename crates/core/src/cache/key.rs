//! Request hashing for cache keys.

use sha2::{Digest, Sha256};

/// Compute the cache key for a request.
///
/// Keys are SHA-256 over the method and URL with a separator, so the same
/// URL fetched with different methods maps to distinct entries. The method
/// is normalized to uppercase before hashing.
pub fn request_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
