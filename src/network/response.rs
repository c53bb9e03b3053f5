//! Normalized outcome of one request

use std::collections::BTreeMap;

use crate::error::RequestError;
use crate::network::client::RawResponse;

#[derive(Clone, Debug, PartialEq)]
pub struct ResponseSuccess {
    pub final_url: String,
    pub status_code: u16,
    pub status_text: String,
    /// One value per name; repeated headers joined with ", "
    pub headers: BTreeMap<String, String>,
    /// Raw decoded body, never reformatted
    pub body_text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResponseResult {
    Success(ResponseSuccess),
    Failure { message: String },
}

impl ResponseResult {
    pub fn from_raw(final_url: impl Into<String>, raw: RawResponse) -> Self {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in raw.headers {
            headers
                .entry(name)
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        ResponseResult::Success(ResponseSuccess {
            final_url: final_url.into(),
            status_code: raw.status,
            status_text: raw.status_text,
            headers,
            body_text: String::from_utf8_lossy(&raw.body).into_owned(),
        })
    }

    pub fn failure(err: &RequestError) -> Self {
        ResponseResult::Failure {
            message: err.to_string(),
        }
    }

    /// `None` when no response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ResponseResult::Success(success) => Some(success.status_code),
            ResponseResult::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_headers_joined() {
        let raw = RawResponse {
            status: 200,
            status_text: "OK".into(),
            headers: vec![
                ("set-cookie".into(), "a=1".into()),
                ("content-type".into(), "text/plain".into()),
                ("set-cookie".into(), "b=2".into()),
            ],
            body: b"hello".to_vec(),
        };
        let ResponseResult::Success(success) = ResponseResult::from_raw("http://x/", raw) else {
            panic!("expected success");
        };
        assert_eq!(success.headers["set-cookie"], "a=1, b=2");
        assert_eq!(success.headers.len(), 2);
        assert_eq!(success.body_text, "hello");
    }

    #[test]
    fn test_body_decoded_lossily() {
        let raw = RawResponse {
            status: 200,
            body: vec![0x68, 0x69, 0xff],
            ..RawResponse::default()
        };
        let result = ResponseResult::from_raw("http://x/", raw);
        let ResponseResult::Success(success) = result else {
            panic!("expected success");
        };
        assert_eq!(success.body_text, "hi\u{fffd}");
    }

    #[test]
    fn test_failure_has_no_status() {
        let result = ResponseResult::failure(&RequestError::TransportFailure("boom".into()));
        assert_eq!(result.status_code(), None);
        assert_eq!(result, ResponseResult::Failure { message: "boom".into() });
    }
}
