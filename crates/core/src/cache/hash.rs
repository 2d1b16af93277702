//! Content-addressed entry key generation.

use sha2::{Digest, Sha256};

use crate::Request;

/// Compute the key an entry is stored under: method and URL, nothing else.
///
/// Headers and request mode do not participate, so a navigation and a plain
/// `GET` for the same URL resolve to the same entry.
pub fn compute_cache_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Entry key for a request.
pub fn request_key(request: &Request) -> String {
    compute_cache_key(request.method.as_str(), &request.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("GET", "http://localhost:8000/weekly-meals/");
        let hash2 = compute_cache_key("GET", "http://localhost:8000/weekly-meals/");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_method() {
        let get = compute_cache_key("GET", "http://localhost:8000/weekly-meals/");
        let head = compute_cache_key("HEAD", "http://localhost:8000/weekly-meals/");
        assert_ne!(get, head);
    }

    #[test]
    fn test_hash_method_case_normalized() {
        let upper = compute_cache_key("GET", "http://localhost:8000/");
        let lower = compute_cache_key("get", "http://localhost:8000/");
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_hash_query_distinguishes() {
        let plain = compute_cache_key("GET", "http://localhost:8000/weekly-meals/meals/");
        let query = compute_cache_key("GET", "http://localhost:8000/weekly-meals/meals/?page=2");
        assert_ne!(plain, query);
    }

    #[test]
    fn test_request_key_ignores_mode() {
        let nav = Request::navigate("http://localhost:8000/weekly-meals/");
        let sub = Request::get("http://localhost:8000/weekly-meals/");
        assert_eq!(request_key(&nav), request_key(&sub));
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("GET", "http://localhost:8000/");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
