//! Entry CRUD operations.
//!
//! Provides functions for storing, reading, and matching cached response
//! snapshots inside named stores.

use super::connection::CacheStorage;
use super::key::request_key;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A stored response snapshot.
///
/// Represents one fetched HTTP response, captured verbatim: status line,
/// headers, and body bytes. Snapshots are immutable once stored; re-storing
/// under the same request replaces the row wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub stored_at: String,
}

impl StoredResponse {
    /// Key this snapshot is filed under.
    pub fn key(&self) -> String {
        request_key(&self.method, &self.url)
    }
}

fn response_from_row(row: &rusqlite::Row<'_>) -> Result<StoredResponse, rusqlite::Error> {
    let headers_json: String = row.get(4)?;
    Ok(StoredResponse {
        method: row.get(0)?,
        url: row.get(1)?,
        status: row.get(2)?,
        status_text: row.get(3)?,
        headers: serde_json::from_str(&headers_json).unwrap_or_default(),
        body: row.get(5)?,
        stored_at: row.get(6)?,
    })
}

impl CacheStorage {
    /// Insert or update an entry in the named store.
    ///
    /// Uses UPSERT semantics: inserts if the request isn't cached yet,
    /// replaces the whole snapshot if it is. The store must already exist.
    pub async fn put_entry(&self, store: &str, response: &StoredResponse) -> Result<(), Error> {
        let store = store.to_string();
        let key = response.key();
        let headers_json = serde_json::to_string(&response.headers).unwrap_or_default();
        let response = response.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (
                        store_name, request_key, method, url, status, status_text,
                        headers_json, body, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(store_name, request_key) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        status = excluded.status,
                        status_text = excluded.status_text,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        &store,
                        &key,
                        &response.method,
                        &response.url,
                        &response.status,
                        &response.status_text,
                        &headers_json,
                        &response.body,
                        &response.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert a batch of entries into the named store in one transaction.
    ///
    /// All-or-nothing: if any row fails, the whole batch is rolled back and
    /// the store keeps whatever it held before the call.
    pub async fn put_entries(&self, store: &str, responses: &[StoredResponse]) -> Result<(), Error> {
        let store = store.to_string();
        let responses = responses.to_vec();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                for response in &responses {
                    let key = request_key(&response.method, &response.url);
                    let headers_json = serde_json::to_string(&response.headers).unwrap_or_default();
                    tx.execute(
                        "INSERT INTO entries (
                            store_name, request_key, method, url, status, status_text,
                            headers_json, body, stored_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                        ON CONFLICT(store_name, request_key) DO UPDATE SET
                            method = excluded.method,
                            url = excluded.url,
                            status = excluded.status,
                            status_text = excluded.status_text,
                            headers_json = excluded.headers_json,
                            body = excluded.body,
                            stored_at = excluded.stored_at",
                        params![
                            &store,
                            &key,
                            &response.method,
                            &response.url,
                            &response.status,
                            &response.status_text,
                            &headers_json,
                            &response.body,
                            &response.stored_at,
                        ],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get an entry from one named store.
    ///
    /// Returns None if the request isn't cached there.
    pub async fn get_entry(&self, store: &str, method: &str, url: &str) -> Result<Option<StoredResponse>, Error> {
        let store = store.to_string();
        let key = request_key(method, url);
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT method, url, status, status_text, headers_json, body, stored_at
                     FROM entries WHERE store_name = ?1 AND request_key = ?2",
                )?;

                let result = stmt.query_row(params![store, key], response_from_row);

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Match a request against every store, oldest store first.
    ///
    /// Mirrors how a browser searches its caches: all still-existing stores
    /// are consulted in creation order, not only the current generation.
    pub async fn match_request(&self, method: &str, url: &str) -> Result<Option<StoredResponse>, Error> {
        let key = request_key(method, url);
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT e.method, e.url, e.status, e.status_text, e.headers_json, e.body, e.stored_at
                     FROM entries e
                     JOIN stores s ON s.name = e.store_name
                     WHERE e.request_key = ?1
                     ORDER BY s.rowid
                     LIMIT 1",
                )?;

                let result = stmt.query_row(params![key], response_from_row);

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_response(url: &str) -> StoredResponse {
        StoredResponse {
            method: "GET".to_string(),
            url: url.to_string(),
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body: b"<html>ok</html>".to_vec(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let storage = CacheStorage::open_in_memory().await.unwrap();
        storage.open_store("recipes-v1.0.0").await.unwrap();
        let response = make_test_response("https://example.com/index.html");

        storage.put_entry("recipes-v1.0.0", &response).await.unwrap();

        let retrieved = storage
            .get_entry("recipes-v1.0.0", "GET", "https://example.com/index.html")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved, response);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let storage = CacheStorage::open_in_memory().await.unwrap();
        storage.open_store("recipes-v1.0.0").await.unwrap();

        let result = storage
            .get_entry("recipes-v1.0.0", "GET", "https://example.com/missing.html")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let storage = CacheStorage::open_in_memory().await.unwrap();
        storage.open_store("recipes-v1.0.0").await.unwrap();

        let mut response = make_test_response("https://example.com/index.html");
        storage.put_entry("recipes-v1.0.0", &response).await.unwrap();

        response.body = b"<html>updated</html>".to_vec();
        storage.put_entry("recipes-v1.0.0", &response).await.unwrap();

        let retrieved = storage
            .get_entry("recipes-v1.0.0", "GET", "https://example.com/index.html")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.body, b"<html>updated</html>".to_vec());
        assert_eq!(storage.entry_count("recipes-v1.0.0").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_put_entries_batch() {
        let storage = CacheStorage::open_in_memory().await.unwrap();
        storage.open_store("recipes-v1.0.0").await.unwrap();

        let batch = vec![
            make_test_response("https://example.com/"),
            make_test_response("https://example.com/styles.css"),
            make_test_response("https://example.com/script.js"),
        ];
        storage.put_entries("recipes-v1.0.0", &batch).await.unwrap();

        assert_eq!(storage.entry_count("recipes-v1.0.0").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_put_entries_requires_store() {
        let storage = CacheStorage::open_in_memory().await.unwrap();

        let batch = vec![make_test_response("https://example.com/")];
        let result = storage.put_entries("recipes-v1.0.0", &batch).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_match_request_searches_all_stores() {
        let storage = CacheStorage::open_in_memory().await.unwrap();
        storage.open_store("recipes-v1.0.0").await.unwrap();
        storage.open_store("recipes-v2.0.0").await.unwrap();

        let response = make_test_response("https://example.com/styles.css");
        storage.put_entry("recipes-v1.0.0", &response).await.unwrap();

        let matched = storage
            .match_request("GET", "https://example.com/styles.css")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.url, response.url);
    }

    #[tokio::test]
    async fn test_match_request_prefers_oldest_store() {
        let storage = CacheStorage::open_in_memory().await.unwrap();
        storage.open_store("recipes-v1.0.0").await.unwrap();
        storage.open_store("recipes-v2.0.0").await.unwrap();

        let mut old = make_test_response("https://example.com/index.html");
        old.body = b"v1".to_vec();
        let mut new = make_test_response("https://example.com/index.html");
        new.body = b"v2".to_vec();

        storage.put_entry("recipes-v2.0.0", &new).await.unwrap();
        storage.put_entry("recipes-v1.0.0", &old).await.unwrap();

        let matched = storage
            .match_request("GET", "https://example.com/index.html")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.body, b"v1".to_vec());
    }

    #[tokio::test]
    async fn test_delete_store_cascades_entries() {
        let storage = CacheStorage::open_in_memory().await.unwrap();
        storage.open_store("recipes-v1.0.0").await.unwrap();
        storage
            .put_entry("recipes-v1.0.0", &make_test_response("https://example.com/index.html"))
            .await
            .unwrap();

        assert!(storage.delete_store("recipes-v1.0.0").await.unwrap());

        let matched = storage.match_request("GET", "https://example.com/index.html").await.unwrap();
        assert!(matched.is_none());
    }

    #[tokio::test]
    async fn test_key_roundtrip() {
        let response = make_test_response("https://example.com/manifest.json");
        assert_eq!(response.key(), request_key("GET", "https://example.com/manifest.json"));
    }
}
