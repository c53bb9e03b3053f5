//! Data models for discovered endpoints

use serde::{Deserialize, Serialize};

use crate::models::HttpMethod;

/// One candidate source file handed to the scanner
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Opaque identifier, usually the file path
    pub id: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        SourceFile {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A discovered API endpoint.
///
/// Identity is `method` + `path`; the remaining fields are diagnostics and
/// are ignored by `PartialEq`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// Normalized path template (e.g. "/api/users/{id}")
    pub path: String,
    /// File the mapping was found in
    pub source_location: String,
    /// Enclosing class name, when one could be found
    pub declaring_unit: Option<String>,
    /// Variable names in `path`, first-occurrence order
    pub variables: Vec<String>,
}

impl Endpoint {
    /// Deduplication key
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.path == other.path
    }
}

impl Eq for Endpoint {}

/// Result of one discovery run
#[derive(Clone, Debug, Default)]
pub struct DiscoveryReport {
    /// Unique by method + path
    pub endpoints: Vec<Endpoint>,
    /// Human-readable log lines
    pub diagnostics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(method: HttpMethod, path: &str, file: &str) -> Endpoint {
        Endpoint {
            method,
            path: path.to_string(),
            source_location: file.to_string(),
            declaring_unit: None,
            variables: Vec::new(),
        }
    }

    #[test]
    fn test_equality_ignores_diagnostics() {
        let a = endpoint(HttpMethod::GET, "/x", "A.java");
        let b = endpoint(HttpMethod::GET, "/x", "B.java");
        let c = endpoint(HttpMethod::POST, "/x", "A.java");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.key(), "GET /x");
    }
}
