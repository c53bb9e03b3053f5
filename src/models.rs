//! Shared request, response and history models

use serde::{Deserialize, Serialize};

use crate::network::ResponseResult;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        }
    }

    /// Parse a verb token case-insensitively. Anything unrecognized is GET.
    pub fn from_token(token: &str) -> HttpMethod {
        match token.trim().to_ascii_uppercase().as_str() {
            "POST" => HttpMethod::POST,
            "PUT" => HttpMethod::PUT,
            "PATCH" => HttpMethod::PATCH,
            "DELETE" => HttpMethod::DELETE,
            _ => HttpMethod::GET,
        }
    }

    /// Every method except GET carries the body when one was entered
    pub fn transmits_body(&self) -> bool {
        !matches!(self, HttpMethod::GET)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-editable header row
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRow {
    pub key: String,
    pub value: String,
}

impl HeaderRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        HeaderRow {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response pane contents
#[derive(Clone, Debug)]
pub struct Response {
    pub status_code: Option<u16>,
    pub body: String,
    pub time_ms: u64,
}

impl Default for Response {
    fn default() -> Self {
        Response {
            status_code: None,
            body: String::from(
                r#"Quick Reference:
────────────────────────────
  ↑/↓   Pick endpoint
  Enter Select endpoint
  Tab   Next panel
  e     Edit field
  s     Send request
  r     Rescan project
  ?     Full help
  q     Quit
────────────────────────────
Select an endpoint on the left to begin."#,
            ),
            time_ms: 0,
        }
    }
}

/// History entry
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub method: HttpMethod,
    pub url: String,
    pub status_code: Option<u16>,
    pub time_ms: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HistoryEntry {
    pub fn new(method: HttpMethod, result: &ResponseResult, fallback_url: &str, time_ms: u64) -> Self {
        let url = match result {
            ResponseResult::Success(success) => success.final_url.clone(),
            ResponseResult::Failure { .. } => fallback_url.to_string(),
        };
        HistoryEntry {
            method,
            url,
            status_code: result.status_code(),
            time_ms,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_defaults_to_get() {
        assert_eq!(HttpMethod::from_token("post"), HttpMethod::POST);
        assert_eq!(HttpMethod::from_token(" DELETE "), HttpMethod::DELETE);
        assert_eq!(HttpMethod::from_token("HEAD"), HttpMethod::GET);
        assert_eq!(HttpMethod::from_token(""), HttpMethod::GET);
    }

    #[test]
    fn test_only_get_drops_body() {
        assert!(!HttpMethod::GET.transmits_body());
        assert!(HttpMethod::DELETE.transmits_body());
        assert!(HttpMethod::POST.transmits_body());
    }
}
