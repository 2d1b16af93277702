//! worker_message tool implementation.
//!
//! Delivery is fire-and-forget: the caller gets an acknowledgement as soon as
//! the message is queued, and nothing is ever posted back.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shellcache_client::{Network, OfflineController};
use shellcache_core::CacheStore;

use crate::tools::json_result;

/// Input parameters for the worker_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkerMessageParams {
    /// Message payload, e.g. `{"action": "cache-url", "url": "/weekly-meals/meals/"}`.
    pub data: Value,
}

/// Output from the worker_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkerMessageOutput {
    pub delivered: bool,
}

/// Implementation of the worker_message tool.
pub fn message_impl<S, N>(
    worker: &OfflineController<S, N>, params: WorkerMessageParams,
) -> Result<CallToolResult, McpError>
where
    S: CacheStore + 'static,
    N: Network + 'static,
{
    let worker = worker.clone();
    tokio::spawn(async move { deliver(&worker, &params.data).await });

    json_result(&WorkerMessageOutput { delivered: true })
}

/// Hand one message to the worker, logging instead of returning failures.
pub async fn deliver<S, N>(worker: &OfflineController<S, N>, data: &Value)
where
    S: CacheStore,
    N: Network,
{
    match worker.message(data).await {
        Ok(Some(url)) => tracing::info!(%url, "cached on request"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "cache-url message failed"),
    }
}
