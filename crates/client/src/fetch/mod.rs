//! Network side of the worker.
//!
//! ### The `Network` seam
//! The worker only ever asks one thing of the network: turn a request into a
//! response. Any HTTP status counts as a response; only transport failures
//! (DNS, refused connection, timeout, oversize body) are errors. Whether a
//! non-2xx response is acceptable is the caller's decision.
//!
//! ### `FetchClient`
//! - reqwest with rustls, gzip/brotli/deflate
//! - Max redirects: 5, final URL reported on the response
//! - Max body bytes: 5MB (configurable)

pub mod url;

use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, parse_origin, resolve};

use shellcache_core::{AppConfig, Error, Request, Response};

/// Anything that can perform a live fetch for the worker.
#[async_trait::async_trait]
pub trait Network: Send + Sync {
    /// Fetch a request, resolving with whatever response the server sent.
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "shellcache/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "shellcache/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// reqwest-backed [`Network`].
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    fn too_large(&self, len: usize) -> Error {
        Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes))
    }
}

fn transport_error(url: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{url}: {err}"))
    } else {
        Error::Network(format!("{url}: {err}"))
    }
}

#[async_trait::async_trait]
impl Network for FetchClient {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let start = Instant::now();
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| Error::InvalidInput(e.to_string()))?;

        let mut builder = self.http.request(method, request.url.as_str());
        if request.is_navigation() {
            builder = builder.header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            );
        }

        let response = builder.send().await.map_err(|e| transport_error(&request.url, &e))?;

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(self.too_large(len as usize));
        }

        let status = response.status();
        let final_url = response.url().to_string();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.bytes().await.map_err(|e| transport_error(&request.url, &e))?;

        if body.len() > self.config.max_bytes {
            return Err(self.too_large(body.len()));
        }

        tracing::debug!(
            "fetched {} {} -> {} {} in {}ms ({} bytes)",
            request.method,
            request.url,
            final_url,
            status.as_u16(),
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(Response { url: final_url, status: status.as_u16(), headers, content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "shellcache/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "meals-worker/2".into(), timeout_ms: 1500, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "meals-worker/2");
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.max_redirects, 5);
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = FetchClient::new(FetchConfig { timeout: Duration::from_secs(2), ..Default::default() }).unwrap();
        // Port 9 (discard) on loopback is closed on any sane test host.
        let result = client.fetch(&Request::get("http://127.0.0.1:9/weekly-meals/")).await;
        assert!(matches!(result, Err(Error::Network(_)) | Err(Error::FetchTimeout(_))));
    }
}
