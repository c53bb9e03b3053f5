//! Request executor - sends a composed request and normalizes the outcome

use url::Url;

use crate::composer::RequestDescriptor;
use crate::error::RequestError;
use crate::network::client::{OutgoingRequest, Transport};
use crate::network::response::ResponseResult;

/// Join the base URL and resolved path. The base is treated as ending in
/// `/` so its last segment is never dropped.
pub fn resolve_url(descriptor: &RequestDescriptor) -> Result<Url, RequestError> {
    let mut base = descriptor.base_url.clone();
    match base.scheme() {
        "http" | "https" => {}
        other => return Err(RequestError::UnsupportedScheme(other.to_string())),
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&descriptor.resolved_path)
        .map_err(|e| RequestError::InvalidBaseUrl {
            url: descriptor.base_url.to_string(),
            reason: e.to_string(),
        })
}

/// The wire request; GET never carries a body
pub fn outgoing_request(descriptor: &RequestDescriptor) -> Result<OutgoingRequest, RequestError> {
    let url = resolve_url(descriptor)?;
    let body = if descriptor.method.transmits_body() {
        descriptor.body.clone()
    } else {
        None
    };

    Ok(OutgoingRequest {
        method: descriptor.method,
        url,
        headers: descriptor.headers.clone(),
        body,
    })
}

/// Execute one request. Every failure becomes a failure result.
pub async fn execute<T: Transport + ?Sized>(transport: &T, descriptor: &RequestDescriptor) -> ResponseResult {
    let request = match outgoing_request(descriptor) {
        Ok(request) => request,
        Err(e) => return ResponseResult::failure(&e),
    };
    let final_url = request.url.to_string();

    tracing::info!(method = %request.method, url = %final_url, "Executing request");
    match transport.send(request).await {
        Ok(raw) => {
            tracing::info!(url = %final_url, status = raw.status, "Request completed");
            ResponseResult::from_raw(final_url, raw)
        }
        Err(e) => {
            tracing::info!(url = %final_url, error = %e, "Request failed");
            ResponseResult::failure(&e)
        }
    }
}
