//! In-process network double for worker tests.
//!
//! Built for this crate's tests and, behind the `test-util` feature, for
//! downstream crates that drive an [`OfflineController`](super::OfflineController).

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use shellcache_core::{Error, Request, Response};

use crate::fetch::Network;

pub const ORIGIN: &str = "http://localhost:8000";

/// Serves registered pages, 404s everything else, and can be switched off.
pub struct FakeNetwork {
    pages: Mutex<HashMap<String, String>>,
    online: AtomicBool,
    calls: AtomicUsize,
}

impl Default for FakeNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self { pages: Mutex::new(HashMap::new()), online: AtomicBool::new(true), calls: AtomicUsize::new(0) }
    }

    /// Register `body` at an origin-relative path.
    pub fn serve(&self, path: &str, body: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(format!("{ORIGIN}{path}"), body.to_string());
    }

    pub fn go_offline(&self) {
        self.online.store(false, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.online.load(Ordering::SeqCst) {
            return Err(Error::Network(format!("{}: connection refused", request.url)));
        }
        let page = self.pages.lock().unwrap().get(&request.url).cloned();
        Ok(match page {
            Some(body) => Response::new(&request.url, 200, body).with_content_type("text/html"),
            None => Response::new(&request.url, 404, "not found"),
        })
    }
}
