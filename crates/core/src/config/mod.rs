//! Worker configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHELLCACHE_*)
//! 2. TOML config file (if SHELLCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Worker configuration.
///
/// Bumping `cache_name` is how a deployment rotates the cache: the next
/// activate deletes every generation with a different name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache store.
    ///
    /// Set via SHELLCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Origin the application is served from. Relative URLs resolve against it.
    ///
    /// Set via SHELLCACHE_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Name of the current cache generation.
    ///
    /// Set via SHELLCACHE_CACHE_NAME environment variable.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Pages guaranteed to be cached once install completes.
    ///
    /// Set via SHELLCACHE_OFFLINE_URLS environment variable.
    #[serde(default = "default_offline_urls")]
    pub offline_urls: Vec<String>,

    /// Requests whose URL contains this substring are intercepted.
    ///
    /// Set via SHELLCACHE_SCOPE_PREFIX environment variable.
    #[serde(default = "default_scope_prefix")]
    pub scope_prefix: String,

    /// Cached page served to offline navigations that miss the cache.
    ///
    /// Set via SHELLCACHE_SHELL_URL environment variable.
    #[serde(default = "default_shell_url")]
    pub shell_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SHELLCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SHELLCACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to read per response.
    ///
    /// Set via SHELLCACHE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./shellcache.sqlite")
}

fn default_origin() -> String {
    "http://localhost:8000".into()
}

fn default_cache_name() -> String {
    "meals-cache-v1".into()
}

fn default_offline_urls() -> Vec<String> {
    vec!["/weekly-meals/".into(), "/weekly-meals/meals/".into(), "/weekly-meals/weekly-plan/".into()]
}

fn default_scope_prefix() -> String {
    "/weekly-meals/".into()
}

fn default_shell_url() -> String {
    "/weekly-meals/".into()
}

fn default_user_agent() -> String {
    "shellcache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            origin: default_origin(),
            cache_name: default_cache_name(),
            offline_urls: default_offline_urls(),
            scope_prefix: default_scope_prefix(),
            shell_url: default_shell_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHELLCACHE_`
    /// 2. TOML file from `SHELLCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or parsed, or if
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHELLCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("SHELLCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
