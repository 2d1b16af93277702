//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_name`, `scope_prefix`, `shell_url` or `user_agent` is blank
    /// - `origin` is not an absolute http(s) URL
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("cache_name", &self.cache_name),
            ("scope_prefix", &self.scope_prefix),
            ("shell_url", &self.shell_url),
            ("user_agent", &self.user_agent),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        match url::Url::parse(&self.origin) {
            Ok(origin) if matches!(origin.scheme(), "http" | "https") => {}
            Ok(_) => return Err(invalid("origin", "scheme must be http or https")),
            Err(e) => return Err(invalid("origin", &e.to_string())),
        }

        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if !self.shell_url.contains(&self.scope_prefix) {
            tracing::warn!(
                shell_url = %self.shell_url,
                scope_prefix = %self.scope_prefix,
                "shell_url is outside the intercepted scope"
            );
        }

        let outside = self
            .offline_urls
            .iter()
            .filter(|u| !u.contains(&self.scope_prefix))
            .count();
        if outside > 0 {
            tracing::warn!(outside, "some offline_urls are outside the intercepted scope");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_blank_cache_name() {
        let config = AppConfig { cache_name: " ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_name"));
    }

    #[test]
    fn test_validate_empty_scope_prefix() {
        let config = AppConfig { scope_prefix: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "scope_prefix"));
    }

    #[test]
    fn test_validate_origin_not_url() {
        let config = AppConfig { origin: "localhost".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "origin"));
    }

    #[test]
    fn test_validate_origin_bad_scheme() {
        let config = AppConfig { origin: "ftp://example.com".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "origin"));
    }

    #[test]
    fn test_validate_max_bytes_zero() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let low = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(low.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let high = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(high.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_shell_outside_scope_is_accepted() {
        let config = AppConfig { shell_url: "/offline.html".into(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_preload_set_is_accepted() {
        let config = AppConfig { offline_urls: Vec::new(), ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
