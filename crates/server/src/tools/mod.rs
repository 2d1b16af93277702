//! MCP tool implementations.
//!
//! Each tool is a thin `*_impl` function over an [`OfflineController`] so it
//! can be exercised without the rmcp router.
//!
//! [`OfflineController`]: shellcache_client::OfflineController

pub mod cache;
pub mod worker;
#[cfg(test)]
pub(crate) mod testing;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use shellcache_core::Error;

pub use cache::inventory_impl;
pub use worker::{WorkerFetchParams, WorkerMessageParams, activate_impl, fetch_impl, install_impl, message_impl};

/// Pretty JSON text content, as every tool returns.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
