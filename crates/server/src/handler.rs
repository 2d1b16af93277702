//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the worker's event handlers.
use crate::tools::{
    WorkerFetchParams, WorkerMessageParams, activate_impl, fetch_impl, install_impl, inventory_impl, message_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use shellcache_client::{FetchClient, OfflineController};
use shellcache_core::CacheDb;

/// The worker as deployed: SQLite store, reqwest network.
pub type Worker = OfflineController<CacheDb, FetchClient>;

/// The main MCP server handler for shellcache.
#[derive(Clone)]
pub struct ShellcacheServer {
    tool_router: ToolRouter<Self>,
    worker: Worker,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl ShellcacheServer {
    /// Create a new server handler around a started worker.
    pub fn new(worker: Worker) -> Self {
        Self { tool_router: Self::tool_router(), worker }
    }

    #[tool(description = "Run the install handler: preload every offline URL into the current cache generation.")]
    async fn worker_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.worker).await
    }

    #[tool(description = "Run the activate handler: delete every cache generation except the current one.")]
    async fn worker_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.worker).await
    }

    /// Dispatch a fetch event.
    ///
    /// In-scope GETs are answered from cache, then network, then (for navigations) the cached shell page.
    /// Everything else goes straight to the network.
    #[tool(
        description = "Dispatch a fetch event. Returns the response and whether it came from cache, network, shell or passthrough."
    )]
    async fn worker_fetch(&self, params: Parameters<WorkerFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.worker, params.0).await
    }

    #[tool(
        description = "Post a message to the worker. {\"action\": \"cache-url\", \"url\": ...} caches that URL in the background; other messages are ignored."
    )]
    async fn worker_message(&self, params: Parameters<WorkerMessageParams>) -> Result<CallToolResult, McpError> {
        message_impl(&self.worker, params.0)
    }

    #[tool(description = "List cache generations and the URLs stored in the current one.")]
    async fn cache_inventory(&self) -> Result<CallToolResult, McpError> {
        inventory_impl(&self.worker).await
    }
}

impl ServerHandler for ShellcacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "shellcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellcache_client::{FetchConfig, WorkerSettings};
    use shellcache_core::AppConfig;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_router_lists_every_tool() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let network = FetchClient::new(FetchConfig::default()).unwrap();
        let settings = WorkerSettings::from_config(&AppConfig::default()).unwrap();
        let server = ShellcacheServer::new(OfflineController::new(Arc::new(db), Arc::new(network), settings));

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, ["cache_inventory", "worker_activate", "worker_fetch", "worker_install", "worker_message"]);
    }
}
