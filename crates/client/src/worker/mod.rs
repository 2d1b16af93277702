//! The offline cache worker.
//!
//! [`OfflineController`] reacts to four lifecycle triggers:
//!
//! - **install**: open the current generation and preload the offline pages.
//! - **activate**: delete every generation that isn't the current one.
//! - **fetch**: for in-scope `GET`s, answer from cache, else network, else
//!   (navigations only) the cached shell page. Cache lookups search the
//!   whole store, current generation first, so a failed install keeps
//!   serving what earlier generations hold.
//! - **message**: `cache-url` messages add a page to the current generation.
//!
//! The controller keeps no state of its own between events. Everything
//! durable lives in the [`CacheStore`], so handlers may interleave freely.

mod fallback;
mod handle;
mod message;
mod scope;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use shellcache_core::{AppConfig, CacheStore, Error, Method, Request, Response};
use url::Url;

use crate::fetch::{Network, parse_origin, resolve};

pub use fallback::{Fallback, ResponseSource, first_of};
pub use handle::CacheHandle;
pub use message::WorkerMessage;
pub use scope::ScopePredicate;

/// The deploy-time constants a worker runs with.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub cache_name: String,
    pub offline_urls: Vec<String>,
    pub scope: ScopePredicate,
    /// Absolute shell URL.
    pub shell_url: String,
    pub origin: Url,
}

impl WorkerSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let origin = parse_origin(&config.origin).map_err(|e| Error::InvalidUrl(format!("origin: {e}")))?;
        let shell_url = resolve(&origin, &config.shell_url)
            .map_err(|e| Error::InvalidUrl(format!("shell_url: {e}")))?
            .to_string();

        Ok(Self {
            cache_name: config.cache_name.clone(),
            offline_urls: config.offline_urls.clone(),
            scope: ScopePredicate::new(config.scope_prefix.clone()),
            shell_url,
            origin,
        })
    }
}

/// What the worker did with a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted; the request follows the default network path.
    Passthrough,
    /// Intercepted and answered.
    Responded { source: ResponseSource, response: Response },
    /// Intercepted, but cache, network and shell all came up empty. The
    /// requester sees a network error; no substitute page is synthesized.
    NoResponse,
}

/// Cache policy for one application scope.
pub struct OfflineController<S, N> {
    store: Arc<S>,
    network: Arc<N>,
    settings: WorkerSettings,
}

impl<S, N> Clone for OfflineController<S, N> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), network: Arc::clone(&self.network), settings: self.settings.clone() }
    }
}

impl<S, N> OfflineController<S, N>
where
    S: CacheStore,
    N: Network,
{
    pub fn new(store: Arc<S>, network: Arc<N>, settings: WorkerSettings) -> Self {
        Self { store, network, settings }
    }

    pub fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Open the current generation.
    pub async fn open_cache(&self) -> Result<CacheHandle<'_, S, N>, Error> {
        CacheHandle::open(&self.settings.cache_name, &self.settings.origin, &*self.store, &*self.network).await
    }

    /// Install: populate the current generation with every offline URL.
    ///
    /// Completes only once the whole batch is stored. Any failure fails the
    /// install and leaves none of the batch behind. Returns the cached URLs.
    pub async fn install(&self) -> Result<Vec<String>, Error> {
        let cache = self.open_cache().await?;
        let cached = cache
            .add_all(self.settings.offline_urls.as_slice())
            .await
            .map_err(|e| Error::PreloadFailed(e.to_string()))?;

        tracing::info!(cache = %self.settings.cache_name, count = cached.len(), "install complete");
        Ok(cached)
    }

    /// Activate: delete every generation other than the current one.
    ///
    /// Deletions run concurrently and are joined. A failed delete is logged
    /// and otherwise ignored. Returns the names that were removed.
    pub async fn activate(&self) -> Result<Vec<String>, Error> {
        let current = self.settings.cache_name.as_str();
        let stale: Vec<String> = self
            .store
            .keys()
            .await?
            .into_iter()
            .filter(|name| name != current)
            .collect();

        let results = join_all(stale.iter().map(|name| self.store.delete(name))).await;

        let mut deleted = Vec::with_capacity(stale.len());
        for (name, result) in stale.into_iter().zip(results) {
            match result {
                Ok(_) => deleted.push(name),
                Err(e) => tracing::warn!(cache = %name, error = %e, "failed to delete stale generation"),
            }
        }

        tracing::info!(cache = %current, deleted = deleted.len(), "activate complete");
        Ok(deleted)
    }

    /// Whether a request falls under this worker at all.
    pub fn intercepts(&self, request: &Request) -> bool {
        request.method == Method::Get && self.settings.scope.contains(&request.url)
    }

    /// Fetch: cache, then network, then (navigations only) the shell page.
    ///
    /// Live network responses are returned as-is and never written back.
    pub async fn fetch(&self, request: &Request) -> FetchOutcome {
        if !self.intercepts(request) {
            return FetchOutcome::Passthrough;
        }

        let name = self.settings.cache_name.as_str();
        let mut chain = vec![
            Fallback::new(ResponseSource::Cache, move || self.store.match_any(name, request)),
            Fallback::new(ResponseSource::Network, move || async move {
                self.network.fetch(request).await.map(Some)
            }),
        ];
        if request.is_navigation() {
            let shell = Request::get(self.settings.shell_url.as_str());
            chain.push(Fallback::new(ResponseSource::Shell, move || async move {
                self.store.match_any(name, &shell).await
            }));
        }

        match first_of(chain).await {
            Some((source, response)) => {
                tracing::debug!(url = %request.url, %source, status = response.status, "responded");
                FetchOutcome::Responded { source, response }
            }
            None => {
                tracing::debug!(url = %request.url, "no response available");
                FetchOutcome::NoResponse
            }
        }
    }

    /// Message: act on `cache-url`, ignore everything else.
    ///
    /// Returns the URL that was cached, or `None` when the message was not
    /// one the worker understands.
    pub async fn message(&self, data: &Value) -> Result<Option<String>, Error> {
        let Some(WorkerMessage::CacheUrl { url }) = WorkerMessage::parse(data) else {
            return Ok(None);
        };

        let cache = self.open_cache().await?;
        let cached = cache.add(&url).await?;
        tracing::debug!(url = %cached, "cached on request");
        Ok(Some(cached))
    }

    /// Install then activate, in that order.
    pub async fn start(&self) -> Result<(), Error> {
        self.install().await?;
        self.activate().await?;
        Ok(())
    }
}
