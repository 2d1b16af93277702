//! shellcache server entry point.
//!
//! Boots the offline cache worker, runs its install and activate phases, then
//! serves the MCP tools on stdio. Logging goes to stderr to avoid interfering
//! with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use shellcache_client::{FetchClient, FetchConfig, OfflineController, WorkerSettings};
use shellcache_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        db = %config.db_path.display(),
        cache = %config.cache_name,
        "starting shellcache on stdio transport"
    );

    let store = CacheDb::open(&config.db_path).await?;
    let network = FetchClient::new(FetchConfig::from(&config))?;
    let settings = WorkerSettings::from_config(&config)?;
    let worker = OfflineController::new(Arc::new(store), Arc::new(network), settings);

    // A failed install keeps whatever generations are already stored.
    if let Err(e) = worker.start().await {
        tracing::warn!(error = %e, "worker start failed, serving existing cache");
    }

    let handler = handler::ShellcacheServer::new(worker);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
