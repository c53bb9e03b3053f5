//! Path template helpers - joining, variable extraction and substitution
//!
//! A path template is a path string with zero or more `{name}` placeholders,
//! e.g. `/api/users/{id}`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Returned by [`substitute`] when one or more placeholders have no value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing path variables: {}", .names.join(", "))]
pub struct MissingVariables {
    pub names: Vec<String>,
}

fn variable_re() -> &'static Regex {
    static VARIABLE: OnceLock<Regex> = OnceLock::new();
    VARIABLE.get_or_init(|| Regex::new(r"\{([^}]+)\}").unwrap())
}

fn slash_run_re() -> &'static Regex {
    static SLASHES: OnceLock<Regex> = OnceLock::new();
    SLASHES.get_or_init(|| Regex::new(r"/{2,}").unwrap())
}

/// Join a base path and a sub path with exactly one separator.
///
/// The result always starts with `/` and never ends with one, except for
/// the root path itself.
pub fn join(base: &str, sub: &str) -> String {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        sub.trim_start_matches('/')
    );
    let mut path = slash_run_re().replace_all(&joined, "/").into_owned();

    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

/// Variable names in first-occurrence order, without duplicates
pub fn extract_variables(path: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in variable_re().captures_iter(path) {
        let name = caps[1].trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Percent-encode a single path segment value
pub fn url_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Replace every `{name}` with its URL-encoded value.
///
/// Either every placeholder is resolved or nothing is: a missing or empty
/// value fails the whole substitution with the full list of missing names.
pub fn substitute(path: &str, values: &HashMap<String, String>) -> Result<String, MissingVariables> {
    let mut missing: Vec<String> = Vec::new();
    let mut resolved = String::with_capacity(path.len());
    let mut last = 0;

    for caps in variable_re().captures_iter(path) {
        let Some(token) = caps.get(0) else { continue };
        let name = caps[1].trim();
        resolved.push_str(&path[last..token.start()]);
        last = token.end();

        if name.is_empty() {
            resolved.push_str(token.as_str());
            continue;
        }

        match values.get(name).filter(|v| !v.is_empty()) {
            Some(value) => resolved.push_str(&url_encode(value)),
            None => {
                if !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
            }
        }
    }
    resolved.push_str(&path[last..]);

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(MissingVariables { names: missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_join_empty_is_root() {
        assert_eq!(join("", ""), "/");
        assert_eq!(join("/", "/"), "/");
    }

    #[test]
    fn test_join_single_separator() {
        assert_eq!(join("/api/", "/users/"), "/api/users");
        assert_eq!(join("/api", "users"), "/api/users");
        assert_eq!(join("api", ""), "/api");
        assert_eq!(join("", "/items/{id}"), "/items/{id}");
        assert_eq!(join("//api//v1", "//x"), "/api/v1/x");
    }

    #[test]
    fn test_join_idempotent() {
        for (a, b) in [("/api/", "/users/"), ("", "x"), ("a//b", "c/"), ("", "")] {
            let once = join(a, b);
            assert_eq!(join(&once, ""), once);
        }
    }

    #[test]
    fn test_extract_variables_dedup_in_order() {
        assert_eq!(extract_variables("/a/{id}/b/{id}/{name}"), vec!["id", "name"]);
        assert_eq!(extract_variables("/a/{ id }/b"), vec!["id"]);
        assert!(extract_variables("/plain/path").is_empty());
    }

    #[test]
    fn test_extract_variables_unterminated() {
        assert_eq!(extract_variables("/a/{id/b"), Vec::<String>::new());
        assert_eq!(extract_variables("/a/{broken/{ok}"), vec!["broken/{ok"]);
    }

    #[test]
    fn test_substitute_missing() {
        let err = substitute("/api/items/{id}", &HashMap::new()).unwrap_err();
        assert_eq!(err.names, vec!["id"]);

        let err = substitute("/{a}/{b}/{a}", &values(&[("b", "")])).unwrap_err();
        assert_eq!(err.names, vec!["a", "b"]);
    }

    #[test]
    fn test_substitute_resolves_and_encodes() {
        assert_eq!(
            substitute("/api/items/{id}", &values(&[("id", "7")])).unwrap(),
            "/api/items/7"
        );
        assert_eq!(
            substitute("/q/{term}", &values(&[("term", "a b/c")])).unwrap(),
            "/q/a%20b%2Fc"
        );
        assert_eq!(
            substitute("/x/{ id }", &values(&[("id", "1")])).unwrap(),
            "/x/1"
        );
    }
}
