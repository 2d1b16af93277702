//! URL resolution against the application origin.
//!
//! Pages post both absolute and origin-relative URLs, and the cache keys on
//! the exact URL string, so every URL entering the worker goes through
//! [`resolve`] first.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse the configured origin.
pub fn parse_origin(origin: &str) -> Result<Url, UrlError> {
    let parsed = Url::parse(origin.trim()).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
}

/// Resolve `input` to the absolute URL used as a cache key.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Join onto `origin` (absolute inputs replace it entirely)
/// 3. Reject anything but http/https
/// 4. Lowercase the host
/// 5. Remove fragment (#...), keep the query string as-is
pub fn resolve(origin: &Url, input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = origin.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed.set_host(Some(&host)).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        parse_origin("http://localhost:8000").unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = resolve(&origin(), "/weekly-meals/meals/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/weekly-meals/meals/");
    }

    #[test]
    fn test_resolve_absolute_replaces_origin() {
        let url = resolve(&origin(), "https://meals.example.com/weekly-meals/").unwrap();
        assert_eq!(url.as_str(), "https://meals.example.com/weekly-meals/");
    }

    #[test]
    fn test_resolve_lowercase_host() {
        let url = resolve(&origin(), "http://LOCALHOST:8000/weekly-meals/").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
    }

    #[test]
    fn test_resolve_remove_fragment() {
        let url = resolve(&origin(), "/weekly-meals/#today").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.as_str(), "http://localhost:8000/weekly-meals/");
    }

    #[test]
    fn test_resolve_preserve_query() {
        let url = resolve(&origin(), "/weekly-meals/weekly-plan/?week=12&year=2024").unwrap();
        assert_eq!(url.query(), Some("week=12&year=2024"));
    }

    #[test]
    fn test_resolve_trim_whitespace() {
        let url = resolve(&origin(), "  /weekly-meals/  ").unwrap();
        assert_eq!(url.path(), "/weekly-meals/");
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve(&origin(), ""), Err(UrlError::Empty)));
        assert!(matches!(resolve(&origin(), "   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve(&origin(), "file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_parse_origin_rejects_relative() {
        assert!(matches!(parse_origin("/weekly-meals/"), Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_origin_rejects_scheme() {
        assert!(matches!(parse_origin("ftp://example.com"), Err(UrlError::UnsupportedScheme(_))));
    }
}
