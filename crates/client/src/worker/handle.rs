//! An opened generation with the platform's add / addAll semantics.

use std::collections::HashSet;

use futures_util::future::try_join_all;
use shellcache_core::{CacheStore, Error, Request, Response};
use url::Url;

use crate::fetch::{Network, resolve};

/// A generation bound to the network it fills itself from.
pub struct CacheHandle<'w, S: ?Sized, N: ?Sized> {
    name: &'w str,
    origin: &'w Url,
    store: &'w S,
    network: &'w N,
}

impl<'w, S, N> CacheHandle<'w, S, N>
where
    S: CacheStore + ?Sized,
    N: Network + ?Sized,
{
    /// Open (creating if absent) the named generation.
    pub async fn open(name: &'w str, origin: &'w Url, store: &'w S, network: &'w N) -> Result<Self, Error> {
        store.open(name).await?;
        Ok(Self { name, origin, store, network })
    }

    pub async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        self.store.match_request(self.name, request).await
    }

    /// Fetch one URL and store it. Rejects on network failure or a non-2xx
    /// status, leaving any previous entry for the URL untouched.
    pub async fn add(&self, url: &str) -> Result<String, Error> {
        let request = self.request_for(url)?;
        let response = self.fetch_cacheable(&request).await?;
        self.store.put(self.name, &request, &response).await?;
        Ok(request.url)
    }

    /// Fetch every URL concurrently, then store them all in one write.
    ///
    /// All-or-nothing: if any URL is invalid, duplicated, unreachable or
    /// answers non-2xx, nothing is written.
    pub async fn add_all<U: AsRef<str>>(&self, urls: &[U]) -> Result<Vec<String>, Error> {
        let requests = urls
            .iter()
            .map(|u| self.request_for(u.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        if let Some(dup) = requests.iter().find(|r| !seen.insert(r.url.as_str())) {
            return Err(Error::InvalidInput(format!("duplicate request in batch: {}", dup.url)));
        }

        let responses = try_join_all(requests.iter().map(|r| self.fetch_cacheable(r))).await?;
        let entries: Vec<(Request, Response)> = requests.into_iter().zip(responses).collect();

        self.store.put_all(self.name, &entries).await?;
        Ok(entries.into_iter().map(|(req, _)| req.url).collect())
    }

    fn request_for(&self, url: &str) -> Result<Request, Error> {
        let resolved = resolve(self.origin, url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Request::get(resolved.to_string()))
    }

    async fn fetch_cacheable(&self, request: &Request) -> Result<Response, Error> {
        let response = self.network.fetch(request).await?;
        if !response.ok() {
            return Err(Error::HttpError(format!("{} answered status {}", request.url, response.status)));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::testing::{FakeNetwork, ORIGIN};
    use shellcache_core::CacheDb;

    #[tokio::test]
    async fn test_add_stores_resolved_url() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let net = FakeNetwork::new();
        net.serve("/weekly-meals/extra/", "<p>extra</p>");
        let origin = Url::parse(ORIGIN).unwrap();

        let cache = CacheHandle::open("meals-cache-v1", &origin, &db, &net).await.unwrap();
        let url = cache.add("/weekly-meals/extra/").await.unwrap();

        assert_eq!(url, format!("{ORIGIN}/weekly-meals/extra/"));
        assert!(cache.match_request(&Request::get(url)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_rejects_error_status() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let net = FakeNetwork::new();
        let origin = Url::parse(ORIGIN).unwrap();

        let cache = CacheHandle::open("meals-cache-v1", &origin, &db, &net).await.unwrap();
        let result = cache.add("/weekly-meals/missing/").await;

        assert!(matches!(result, Err(Error::HttpError(_))));
        assert!(db.entry_urls("meals-cache-v1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_all_is_all_or_nothing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let net = FakeNetwork::new();
        net.serve("/weekly-meals/", "home");
        let origin = Url::parse(ORIGIN).unwrap();

        let cache = CacheHandle::open("meals-cache-v1", &origin, &db, &net).await.unwrap();
        let result = cache.add_all(&["/weekly-meals/", "/weekly-meals/meals/"]).await;

        assert!(result.is_err());
        assert!(db.entry_urls("meals-cache-v1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_all_rejects_duplicates_before_fetching() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let net = FakeNetwork::new();
        net.serve("/weekly-meals/", "home");
        let origin = Url::parse(ORIGIN).unwrap();

        let cache = CacheHandle::open("meals-cache-v1", &origin, &db, &net).await.unwrap();
        let result = cache.add_all(&["/weekly-meals/", "/weekly-meals/#top"]).await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(net.calls(), 0);
    }

    #[tokio::test]
    async fn test_add_all_empty_batch() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let net = FakeNetwork::new();
        let origin = Url::parse(ORIGIN).unwrap();

        let cache = CacheHandle::open("meals-cache-v1", &origin, &db, &net).await.unwrap();
        let stored = cache.add_all::<&str>(&[]).await.unwrap();

        assert!(stored.is_empty());
        assert!(db.has_generation("meals-cache-v1").await.unwrap());
    }
}
