//! HTTP transport - the seam between the executor and the wire

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::RequestError;
use crate::models::HttpMethod;

/// Exactly what goes on the wire
#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A fully buffered response. Header names may repeat.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and buffer the whole response
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, RequestError>;
}

/// `reqwest`-backed transport; clones share one connection pool
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        ReqwestTransport::new(create_client(None))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, RequestError> {
        let method = match request.method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::DELETE => reqwest::Method::DELETE,
        };

        let mut req_builder = self.client.request(method, request.url);
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let resp = req_builder.send().await.map_err(describe_error)?;

        let status = resp.status();
        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = resp
            .bytes()
            .await
            .map_err(|e| RequestError::TransportFailure(format!("Error reading body: {}", error_chain(&e))))?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: body.to_vec(),
        })
    }
}

fn describe_error(e: reqwest::Error) -> RequestError {
    let msg = if e.is_timeout() {
        format!("Request timed out: {}", error_chain(&e))
    } else if e.is_connect() {
        format!("Connection failed: {}", error_chain(&e))
    } else {
        format!("Request failed: {}", error_chain(&e))
    };
    RequestError::TransportFailure(msg)
}

/// An error and all of its sources, outermost first
fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![e.to_string()];
    let mut source = e.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = inner.source();
    }
    parts.join(": ")
}

/// Create an HTTP client. No timeout is applied unless one is given.
pub fn create_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}
