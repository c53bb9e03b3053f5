//! Request composer - validates user input and builds a ready-to-send request
//!
//! All inputs come straight from editable fields, so every string is trimmed
//! and checked here before anything reaches the network.

use std::collections::HashMap;

use url::Url;

use crate::constants::{DEFAULT_HEADERS, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PROTOCOL};
use crate::discovery::Endpoint;
use crate::error::RequestError;
use crate::models::{HeaderRow, HttpMethod};
use crate::path_template;

/// A fully validated request for one endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// Scheme, host and port only
    pub base_url: Url,
    /// Endpoint path with every variable substituted
    pub resolved_path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Caller-owned selection and input state for composing requests
#[derive(Clone, Debug)]
pub struct Session {
    pub selected: Option<Endpoint>,
    pub host: String,
    pub protocol: String,
    pub port: String,
    pub path_values: HashMap<String, String>,
    pub header_rows: Vec<HeaderRow>,
    pub body: String,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            selected: None,
            host: DEFAULT_HOST.to_string(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            port: DEFAULT_PORT.to_string(),
            path_values: HashMap::new(),
            header_rows: DEFAULT_HEADERS
                .iter()
                .map(|(k, v)| HeaderRow::new(*k, *v))
                .collect(),
            body: String::new(),
        }
    }
}

impl Session {
    /// Select an endpoint, starting with a blank value for each of its variables
    pub fn select(&mut self, endpoint: Endpoint) {
        self.path_values = endpoint
            .variables
            .iter()
            .map(|name| (name.clone(), String::new()))
            .collect();
        self.selected = Some(endpoint);
    }

    /// Validate every field and build the request.
    ///
    /// Checks run in order: selection, host, port, base URL, path variables.
    pub fn compose(&self) -> Result<RequestDescriptor, RequestError> {
        let endpoint = self.selected.as_ref().ok_or(RequestError::NoEndpointSelected)?;

        let base_url = build_base_url(&self.protocol, &self.host, &self.port)?;

        let values: HashMap<String, String> = self
            .path_values
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect();
        let resolved_path = path_template::substitute(&endpoint.path, &values)?;

        Ok(RequestDescriptor {
            method: endpoint.method,
            base_url,
            resolved_path,
            headers: collect_headers(&self.header_rows),
            body: Some(self.body.clone()).filter(|b| !b.is_empty()),
        })
    }
}

/// Only the literal "https" selects TLS; every other value means "http"
pub fn normalize_protocol(protocol: &str) -> &'static str {
    if protocol.trim() == "https" {
        "https"
    } else {
        "http"
    }
}

pub fn validate_host(host: &str) -> Result<&str, RequestError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(RequestError::InvalidHost);
    }
    Ok(host)
}

/// 1 to 5 ASCII digits with a value in 1..=65535
pub fn validate_port(port: &str) -> Result<u16, RequestError> {
    let trimmed = port.trim();
    let invalid = || RequestError::InvalidPort(trimmed.to_string());

    if trimmed.is_empty() || trimmed.len() > 5 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match trimmed.parse::<u32>() {
        Ok(n @ 1..=65535) => Ok(n as u16),
        _ => Err(invalid()),
    }
}

/// `protocol://host:port`, rejected when the host smuggles in a path,
/// query or fragment
pub fn build_base_url(protocol: &str, host: &str, port: &str) -> Result<Url, RequestError> {
    let host = validate_host(host)?;
    let port = validate_port(port)?;
    let raw = format!("{}://{}:{}", normalize_protocol(protocol), host, port);

    let url = Url::parse(&raw).map_err(|e| RequestError::InvalidBaseUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(RequestError::InvalidBaseUrl {
            url: raw,
            reason: "must not contain a path".to_string(),
        });
    }
    Ok(url)
}

/// Header rows as an ordered mapping. Blank keys are dropped; a repeated
/// key keeps its first position and takes the later value.
pub fn collect_headers(rows: &[HeaderRow]) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    for row in rows {
        let key = row.key.trim();
        if key.is_empty() {
            continue;
        }
        let value = row.value.trim().to_string();
        match headers.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value,
            None => headers.push((key.to_string(), value)),
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(method: HttpMethod, path: &str) -> Endpoint {
        Endpoint {
            method,
            path: path.to_string(),
            source_location: "ItemController.java".to_string(),
            declaring_unit: Some("ItemController".to_string()),
            variables: path_template::extract_variables(path),
        }
    }

    fn session_for(method: HttpMethod, path: &str) -> Session {
        let mut session = Session::default();
        session.select(endpoint(method, path));
        session
    }

    #[test]
    fn test_no_endpoint_short_circuits() {
        let session = Session {
            host: String::new(),
            port: "abc".to_string(),
            ..Session::default()
        };
        assert_eq!(session.compose().unwrap_err(), RequestError::NoEndpointSelected);
    }

    #[test]
    fn test_invalid_host() {
        let mut session = session_for(HttpMethod::GET, "/x");
        session.host = "   ".to_string();
        assert_eq!(session.compose().unwrap_err(), RequestError::InvalidHost);
    }

    #[test]
    fn test_port_validation() {
        assert!(matches!(validate_port("70000"), Err(RequestError::InvalidPort(_))));
        assert!(matches!(validate_port("abc"), Err(RequestError::InvalidPort(_))));
        assert!(matches!(validate_port("0"), Err(RequestError::InvalidPort(_))));
        assert!(matches!(validate_port("123456"), Err(RequestError::InvalidPort(_))));
        assert!(matches!(validate_port("-1"), Err(RequestError::InvalidPort(_))));
        assert!(matches!(validate_port(""), Err(RequestError::InvalidPort(_))));
        assert_eq!(validate_port("8080").unwrap(), 8080);
        assert_eq!(validate_port(" 65535 ").unwrap(), 65535);
    }

    #[test]
    fn test_protocol_fallback() {
        assert_eq!(normalize_protocol("https"), "https");
        assert_eq!(normalize_protocol("ftp"), "http");
        assert_eq!(normalize_protocol("HTTPS"), "http");
        assert_eq!(normalize_protocol(""), "http");
    }

    #[test]
    fn test_base_url() {
        let url = build_base_url("https", " example.com ", "8443").unwrap();
        assert_eq!(url.as_str(), "https://example.com:8443/");

        let err = build_base_url("http", "bad host", "80").unwrap_err();
        assert!(matches!(err, RequestError::InvalidBaseUrl { .. }));

        let err = build_base_url("http", "localhost/api", "80").unwrap_err();
        assert!(matches!(err, RequestError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_missing_path_variables_blocks_compose() {
        let mut session = session_for(HttpMethod::GET, "/api/items/{id}/parts/{part}");
        session.path_values.insert("part".to_string(), "  ".to_string());
        assert_eq!(
            session.compose().unwrap_err(),
            RequestError::MissingPathVariables(vec!["id".to_string(), "part".to_string()])
        );
    }

    #[test]
    fn test_compose_success() {
        let mut session = session_for(HttpMethod::POST, "/api/items/{id}");
        session.path_values.insert("id".to_string(), " 7 ".to_string());
        session.body = "{\"name\": \"Tom\"}".to_string();
        session.header_rows.push(HeaderRow::new("  ", "dropped"));
        session.header_rows.push(HeaderRow::new("X-Trace", ""));

        let descriptor = session.compose().unwrap();
        assert_eq!(descriptor.method, HttpMethod::POST);
        assert_eq!(descriptor.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(descriptor.resolved_path, "/api/items/7");
        assert_eq!(descriptor.body.as_deref(), Some("{\"name\": \"Tom\"}"));
        assert_eq!(descriptor.headers.len(), 3);
        assert_eq!(descriptor.headers[2], ("X-Trace".to_string(), String::new()));
    }

    #[test]
    fn test_select_resets_values() {
        let mut session = session_for(HttpMethod::GET, "/a/{x}");
        session.path_values.insert("x".to_string(), "1".to_string());
        session.select(endpoint(HttpMethod::GET, "/b/{y}/{z}"));
        assert_eq!(session.path_values.len(), 2);
        assert!(session.path_values.values().all(|v| v.is_empty()));
    }

    #[test]
    fn test_collect_headers_repeated_key() {
        let rows = vec![
            HeaderRow::new("Accept", "text/plain"),
            HeaderRow::new("X-A", "1"),
            HeaderRow::new(" Accept ", "application/json"),
        ];
        assert_eq!(
            collect_headers(&rows),
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("X-A".to_string(), "1".to_string()),
            ]
        );
    }
}
