//! worker_install and worker_activate tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::{Network, OfflineController};
use shellcache_core::CacheStore;

use crate::tools::json_result;

/// Output from the worker_install tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkerInstallOutput {
    /// The generation that was populated.
    pub cache_name: String,
    /// Absolute URLs now stored in it.
    pub cached: Vec<String>,
}

/// Output from the worker_activate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkerActivateOutput {
    /// The generation that was kept.
    pub cache_name: String,
    /// Stale generations that were removed.
    pub deleted: Vec<String>,
}

/// Implementation of the worker_install tool.
pub async fn install_impl<S, N>(worker: &OfflineController<S, N>) -> Result<CallToolResult, McpError>
where
    S: CacheStore,
    N: Network,
{
    let cached = worker.install().await?;
    json_result(&WorkerInstallOutput { cache_name: worker.settings().cache_name.clone(), cached })
}

/// Implementation of the worker_activate tool.
pub async fn activate_impl<S, N>(worker: &OfflineController<S, N>) -> Result<CallToolResult, McpError>
where
    S: CacheStore,
    N: Network,
{
    let deleted = worker.activate().await?;
    json_result(&WorkerActivateOutput { cache_name: worker.settings().cache_name.clone(), deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{payload, worker};

    #[tokio::test]
    async fn test_install_reports_cached_urls() {
        let worker = worker().await;
        let result = install_impl(&worker).await.unwrap();
        let output: WorkerInstallOutput = serde_json::from_value(payload(&result)).unwrap();

        assert_eq!(output.cache_name, "meals-cache-v1");
        assert_eq!(
            output.cached,
            vec![
                "http://localhost:8000/weekly-meals/".to_string(),
                "http://localhost:8000/weekly-meals/meals/".to_string(),
                "http://localhost:8000/weekly-meals/weekly-plan/".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_install_offline_is_preload_failure() {
        let worker = worker().await;
        worker.network().go_offline();

        let err = install_impl(&worker).await.unwrap_err();
        assert_eq!(err.code.0, -32009);
        assert!(err.message.contains("NETWORK_ERROR"));
    }

    #[tokio::test]
    async fn test_activate_reports_deleted() {
        let worker = worker().await;
        worker.store().open("meals-cache-v0").await.unwrap();

        let result = activate_impl(&worker).await.unwrap();
        let output: WorkerActivateOutput = serde_json::from_value(payload(&result)).unwrap();

        assert_eq!(output.deleted, vec!["meals-cache-v0".to_string()]);
        assert!(!worker.store().has("meals-cache-v0").await.unwrap());
    }
}
