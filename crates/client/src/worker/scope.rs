//! Which requests the worker may intercept.

/// A URL substring test. Requests whose URL doesn't contain the prefix are
/// left entirely to the default network path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePredicate {
    prefix: String,
}

impl ScopePredicate {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Plain substring match, anywhere in the URL (query included).
    pub fn contains(&self, url: &str) -> bool {
        url.contains(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_scope() {
        let scope = ScopePredicate::new("/weekly-meals/");
        assert!(scope.contains("http://localhost:8000/weekly-meals/"));
        assert!(scope.contains("http://localhost:8000/weekly-meals/meals/12/"));
    }

    #[test]
    fn test_out_of_scope() {
        let scope = ScopePredicate::new("/weekly-meals/");
        assert!(!scope.contains("http://localhost:8000/admin/"));
        assert!(!scope.contains("http://localhost:8000/weekly-meals"));
        assert!(!scope.contains("http://localhost:8000/static/meals/app.css"));
    }

    #[test]
    fn test_substring_anywhere() {
        let scope = ScopePredicate::new("/weekly-meals/");
        assert!(scope.contains("http://localhost:8000/login/?next=/weekly-meals/"));
    }
}
