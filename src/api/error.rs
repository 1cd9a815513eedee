use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::backend::transport::RawResponse;

/// A mandatory path or body parameter was absent. Raised before anything is
/// sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("required parameter {field} was missing when calling {operation}")]
pub struct RequiredError {
    field: String,
    operation: &'static str,
}

impl RequiredError {
    pub fn new(field: impl Into<String>, operation: &'static str) -> Self {
        RequiredError {
            field: field.into(),
            operation,
        }
    }

    /// Name of the missing parameter.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

/// Error body returned by the API server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorStatus {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<ProtobufAny>,
}

impl ErrorStatus {
    pub fn message(&self) -> &str {
        match &self.message {
            Some(message) if self.error.is_empty() => message,
            _ => &self.error,
        }
    }
}

/// An arbitrary typed payload; `value` is kept as the server sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtobufAny {
    #[serde(default, alias = "@type")]
    pub type_url: String,
    #[serde(default)]
    pub value: String,
}

/// A response outside the 2xx range, kept untouched.
#[derive(Debug, Clone)]
pub struct ResponseError {
    response: RawResponse,
}

impl ResponseError {
    pub fn new(response: RawResponse) -> Self {
        ResponseError { response }
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    pub fn response(&self) -> &RawResponse {
        &self.response
    }

    pub fn into_response(self) -> RawResponse {
        self.response
    }

    /// Parses the body as the server's error status, if it is one.
    ///
    /// Every field of [`ErrorStatus`] has a default, so any JSON object would
    /// parse. Bodies without an error message are not treated as one.
    pub fn error_status(&self) -> Option<ErrorStatus> {
        serde_json::from_str::<ErrorStatus>(&self.response.body)
            .ok()
            .filter(|status| !status.message().is_empty())
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_status() {
            Some(status) => write!(f, "{} (code {}): {}", self.status(), status.code, status.message()),
            None => write!(f, "unknown {} error:\n{}", self.status(), self.response.body),
        }
    }
}

impl std::error::Error for ResponseError {}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Required(#[from] RequiredError),
    #[error("request failed with status {0}")]
    Response(#[from] ResponseError),
    #[error("the request could not be sent: {0:?}")]
    Transport(#[source] anyhow::Error),
    #[error("serializing the request failed: {0:?}")]
    Serialize(#[source] anyhow::Error),
    #[error("deserializing the response failed: {0:?}")]
    Deserialize(#[source] anyhow::Error),
}

impl Error {
    /// HTTP status of a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Response(error) => Some(error.status()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: u16, body: &str) -> ResponseError {
        ResponseError::new(RawResponse {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.to_owned(),
        })
    }

    #[test]
    fn parse_error_status() {
        let error = failure(
            404,
            r#"{
                "error": "experiment 42 not found",
                "code": 5,
                "details": [ { "@type": "type.googleapis.com/api.Error", "value": "" } ]
            }"#,
        );
        let status = error.error_status().unwrap();
        assert_eq!(status.code, 5);
        assert_eq!(status.details[0].type_url, "type.googleapis.com/api.Error");
        assert_eq!(error.to_string(), "404 (code 5): experiment 42 not found");
    }

    #[test]
    fn message_falls_back() {
        let error = failure(400, r#"{ "code": 3, "message": "bad filter" }"#);
        assert_eq!(error.error_status().unwrap().message(), "bad filter");
    }

    #[test]
    fn unknown_error_body_is_kept() {
        let error = failure(502, "<html>bad gateway</html>");
        assert!(error.error_status().is_none());
        assert_eq!(error.response().body, "<html>bad gateway</html>");
        assert!(error.to_string().contains("unknown 502 error"));
    }

    #[test]
    fn foreign_json_body_is_kept() {
        let body = r#"{"reason":"upstream connect error"}"#;
        let error = failure(503, body);
        assert!(error.error_status().is_none());
        let rendered = error.to_string();
        assert!(rendered.contains("unknown 503 error"));
        assert!(rendered.contains(body));
    }

    #[test]
    fn status_is_exposed_through_error() {
        let error = Error::from(failure(404, ""));
        assert_eq!(error.status(), Some(404));
        assert!(error.is_not_found());
        let required = Error::from(RequiredError::new("id", "GetExperiment"));
        assert_eq!(required.status(), None);
    }
}
