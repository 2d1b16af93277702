//! Client code for shellcache.
//!
//! This crate provides the network fetch pipeline and the offline cache
//! worker that decides, per request, between cache, network and the shell
//! page.

pub mod fetch;
pub mod worker;

pub use fetch::{FetchClient, FetchConfig, Network};
pub use worker::{FetchOutcome, OfflineController, ResponseSource, WorkerMessage, WorkerSettings};
