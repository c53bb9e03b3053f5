//! Errors raised while composing or executing a request
//!
//! Every variant is surfaced to the user verbatim through its `Display`
//! message; none of them aborts the application.

use thiserror::Error;

use crate::path_template::MissingVariables;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("select an endpoint first")]
    NoEndpointSelected,

    #[error("host must not be empty")]
    InvalidHost,

    #[error("invalid port {0:?}: expected a number between 1 and 65535")]
    InvalidPort(String),

    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("missing path variables: {}", .0.join(", "))]
    MissingPathVariables(Vec<String>),

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("{0}")]
    TransportFailure(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("body is not valid JSON: {0}")]
    MalformedJsonBody(String),
}

impl RequestError {
    /// Names of the input fields the error is attributed to
    pub fn fields(&self) -> Vec<String> {
        match self {
            RequestError::InvalidHost => vec!["host".to_string()],
            RequestError::InvalidPort(_) => vec!["port".to_string()],
            RequestError::InvalidBaseUrl { .. } => {
                vec!["protocol".to_string(), "host".to_string(), "port".to_string()]
            }
            RequestError::MissingPathVariables(names) => names.clone(),
            RequestError::MalformedJsonBody(_) => vec!["body".to_string()],
            RequestError::NoEndpointSelected
            | RequestError::UnsupportedScheme(_)
            | RequestError::TransportFailure(_)
            | RequestError::Cancelled => Vec::new(),
        }
    }
}

impl From<MissingVariables> for RequestError {
    fn from(err: MissingVariables) -> Self {
        RequestError::MissingPathVariables(err.names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variables_message_and_fields() {
        let err = RequestError::from(MissingVariables {
            names: vec!["id".into(), "name".into()],
        });
        assert_eq!(err.to_string(), "missing path variables: id, name");
        assert_eq!(err.fields(), vec!["id", "name"]);
    }

    #[test]
    fn test_port_attributed_to_port_field() {
        let err = RequestError::InvalidPort("70000".into());
        assert_eq!(err.fields(), vec!["port"]);
    }
}
