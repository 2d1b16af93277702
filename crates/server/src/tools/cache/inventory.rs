//! cache_inventory tool implementation.
//!
//! Lists the stored generations and what the current one holds.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::{Network, OfflineController};
use shellcache_core::CacheStore;

use crate::tools::json_result;

/// Output from the cache_inventory tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInventoryOutput {
    /// Name of the current generation.
    pub current: String,
    /// Every generation in the store, oldest first.
    pub generations: Vec<String>,
    /// URLs cached in the current generation.
    pub urls: Vec<String>,
}

/// Implementation of the cache_inventory tool.
pub async fn inventory_impl<S, N>(worker: &OfflineController<S, N>) -> Result<CallToolResult, McpError>
where
    S: CacheStore,
    N: Network,
{
    let current = worker.settings().cache_name.clone();
    let generations = worker.store().keys().await?;
    let urls = worker.store().entry_urls(&current).await?;

    json_result(&CacheInventoryOutput { current, generations, urls })
}
