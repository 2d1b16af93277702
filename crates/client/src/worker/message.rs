//! Page -> worker message protocol.
//!
//! One shape is understood: `{ "action": "cache-url", "url": "<url>" }`.
//! Anything else, including a `cache-url` with a missing or empty URL, is
//! not an error. It simply isn't a message the worker acts on.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action")]
pub enum WorkerMessage {
    /// Add one URL to the current generation.
    #[serde(rename = "cache-url")]
    CacheUrl { url: String },
}

impl WorkerMessage {
    /// Recognize a message, or `None` for every other shape.
    pub fn parse(data: &Value) -> Option<Self> {
        match WorkerMessage::deserialize(data).ok()? {
            WorkerMessage::CacheUrl { url } if url.is_empty() => None,
            message => Some(message),
        }
    }
}
