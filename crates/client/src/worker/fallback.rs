//! Ordered fallback lookups: first success wins.
//!
//! Each step is lazy. A step only runs once every earlier step has come back
//! empty or failed, so the chain is a strict sequence and never a race.

use std::fmt;
use std::future::Future;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Serialize;
use shellcache_core::Error;

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Network,
    Shell,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSource::Cache => write!(f, "cache"),
            ResponseSource::Network => write!(f, "network"),
            ResponseSource::Shell => write!(f, "shell"),
        }
    }
}

type Lookup<'a, T> = Box<dyn FnOnce() -> BoxFuture<'a, Result<Option<T>, Error>> + Send + 'a>;

/// One step of a fallback chain.
///
/// The lookup resolves to `Ok(Some(_))` on success, `Ok(None)` when it has
/// nothing to offer, or `Err(_)` when it failed. The last two both mean
/// "try the next step".
pub struct Fallback<'a, T> {
    source: ResponseSource,
    lookup: Lookup<'a, T>,
}

impl<'a, T> Fallback<'a, T> {
    pub fn new<F, Fut>(source: ResponseSource, lookup: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<Option<T>, Error>> + Send + 'a,
    {
        Self { source, lookup: Box::new(move || lookup().boxed()) }
    }
}

/// Run `chain` in order and return the first value produced.
pub async fn first_of<T>(chain: Vec<Fallback<'_, T>>) -> Option<(ResponseSource, T)> {
    for step in chain {
        let source = step.source;
        match (step.lookup)().await {
            Ok(Some(value)) => return Some((source, value)),
            Ok(None) => tracing::debug!(%source, "fallback step came back empty"),
            Err(e) => tracing::debug!(%source, error = %e, "fallback step failed"),
        }
    }
    None
}
