//! Presentation helpers for bodies and responses

use crate::error::RequestError;
use crate::network::ResponseResult;

/// Pretty-print JSON-looking text; anything else comes back unchanged
pub fn pretty_body(text: &str) -> String {
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return text.to_string();
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    }
}

/// Reformat a request body as indented JSON
pub fn format_json_body(raw: &str) -> Result<String, RequestError> {
    let json: serde_json::Value = serde_json::from_str(raw.trim())
        .map_err(|e| RequestError::MalformedJsonBody(e.to_string()))?;
    serde_json::to_string_pretty(&json).map_err(|e| RequestError::MalformedJsonBody(e.to_string()))
}

/// Status line, headers and body as shown in the response pane
pub fn render_response(result: &ResponseResult) -> String {
    match result {
        ResponseResult::Success(success) => {
            let headers = serde_json::to_string_pretty(&success.headers).unwrap_or_else(|_| "{}".to_string());
            format!(
                "Status: {} {}\nURL: {}\n\nHeaders:\n{}\n\nBody:\n{}",
                success.status_code,
                success.status_text,
                success.final_url,
                headers,
                pretty_body(&success.body_text)
            )
        }
        ResponseResult::Failure { message } => format!("Error: {}", message),
    }
}
