//! The cache store seam the worker is written against.

use async_trait::async_trait;

use super::connection::CacheDb;
use crate::{Error, Request, Response};

/// Named-generation key/value store of request -> response snapshots.
///
/// Per-key operations are atomic; nothing here spans more than one call,
/// so concurrent handlers only ever race to "last write wins" on a key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Open (creating if absent) a generation.
    async fn open(&self, name: &str) -> Result<(), Error>;

    async fn has(&self, name: &str) -> Result<bool, Error>;

    /// Every generation name present in storage.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Delete a generation with all its entries. Absent names are a no-op
    /// that reports `false`.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    async fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>, Error>;

    /// Store-wide lookup. The `preferred` generation is consulted first, then
    /// every other generation in creation order.
    async fn match_any(&self, preferred: &str, request: &Request) -> Result<Option<Response>, Error>;

    async fn put(&self, name: &str, request: &Request, response: &Response) -> Result<(), Error>;

    /// Write a batch atomically.
    async fn put_all(&self, name: &str, entries: &[(Request, Response)]) -> Result<(), Error>;

    /// URLs cached in a generation.
    async fn entry_urls(&self, name: &str) -> Result<Vec<String>, Error>;
}

#[async_trait]
impl CacheStore for CacheDb {
    async fn open(&self, name: &str) -> Result<(), Error> {
        self.open_generation(name).await
    }

    async fn has(&self, name: &str) -> Result<bool, Error> {
        self.has_generation(name).await
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.generation_names().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        self.delete_generation(name).await
    }

    async fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>, Error> {
        self.match_entry(name, request).await
    }

    async fn match_any(&self, preferred: &str, request: &Request) -> Result<Option<Response>, Error> {
        self.match_any_entry(preferred, request).await
    }

    async fn put(&self, name: &str, request: &Request, response: &Response) -> Result<(), Error> {
        self.put_entry(name, request, response).await
    }

    async fn put_all(&self, name: &str, entries: &[(Request, Response)]) -> Result<(), Error> {
        self.put_entries(name, entries).await
    }

    async fn entry_urls(&self, name: &str) -> Result<Vec<String>, Error> {
        CacheDb::entry_urls(self, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn roundtrip(store: &dyn CacheStore) {
        let req = Request::get("http://localhost:8000/weekly-meals/");
        store.open("meals-cache-v1").await.unwrap();
        assert!(store.has("meals-cache-v1").await.unwrap());
        assert!(store.match_request("meals-cache-v1", &req).await.unwrap().is_none());

        store
            .put("meals-cache-v1", &req, &Response::new(&req.url, 200, "home"))
            .await
            .unwrap();
        assert!(store.match_request("meals-cache-v1", &req).await.unwrap().is_some());
        assert_eq!(store.keys().await.unwrap(), vec!["meals-cache-v1".to_string()]);
        assert!(store.match_any("meals-cache-v2", &req).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sqlite_store_through_trait_object() {
        let db = CacheDb::open_in_memory().await.unwrap();
        roundtrip(&db).await;
    }
}
