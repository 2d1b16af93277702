//! worker_fetch tool implementation.
//!
//! Dispatches a fetch event. Requests the worker does not intercept are sent
//! to the network exactly as the platform would.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::fetch::resolve;
use shellcache_client::{FetchOutcome, Network, OfflineController};
use shellcache_core::{CacheStore, Error, Method, Request, RequestMode, Response};
use url::Url;

use crate::tools::json_result;

/// Input parameters for the worker_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkerFetchParams {
    /// URL to request, absolute or relative to the configured origin.
    pub url: String,

    /// HTTP method (default: "GET").
    #[serde(default = "default_method")]
    pub method: String,

    /// Treat the request as a top-level document navigation.
    #[serde(default)]
    pub navigate: bool,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for the worker_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkerFetchOutput {
    /// Whether the worker handled the request.
    pub intercepted: bool,
    /// One of "cache", "network", "shell" or "passthrough".
    pub source: String,
    pub status: u16,
    /// URL of the response actually served.
    pub url: String,
    pub content_type: Option<String>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
}

impl WorkerFetchOutput {
    fn new(intercepted: bool, source: String, response: Response) -> Self {
        Self {
            intercepted,
            source,
            status: response.status,
            url: response.url,
            content_type: response.content_type,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        }
    }
}

/// Implementation of the worker_fetch tool.
pub async fn fetch_impl<S, N>(
    worker: &OfflineController<S, N>, params: WorkerFetchParams,
) -> Result<CallToolResult, McpError>
where
    S: CacheStore,
    N: Network,
{
    let method: Method = params.method.parse()?;
    let url = resolve(&worker.settings().origin, &params.url)
        .map_err(|e| Error::InvalidUrl(format!("{}: {e}", params.url)))?;

    let mut request = Request::new(method, url.to_string());
    if params.navigate {
        request.mode = RequestMode::Navigate;
    }

    let output = match worker.fetch(&request).await {
        FetchOutcome::Passthrough => {
            // Absolute URLs leave exactly as the caller wrote them.
            if Url::parse(&params.url).is_ok() {
                request.url = params.url;
            }
            let response = worker.network().fetch(&request).await?;
            WorkerFetchOutput::new(false, "passthrough".into(), response)
        }
        FetchOutcome::Responded { source, response } => WorkerFetchOutput::new(true, source.to_string(), response),
        FetchOutcome::NoResponse => {
            return Err(Error::Network(format!("no cached or live response for {}", request.url)).into());
        }
    };

    json_result(&output)
}
