//! factdesk error types

use crate::facts::FactStatus;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// factdesk error type
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced fact does not exist
    #[error("Fact not found: {0}")]
    NotFound(String),

    /// Fact is already in a terminal state incompatible with the request
    #[error("Fact {id} is {from}, cannot become {to}")]
    InvalidTransition {
        id: String,
        from: FactStatus,
        to: FactStatus,
    },

    /// Conversation engine is not configured or cannot be reached
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Conversation engine accepted the request and then failed
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for factdesk operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status the boundary maps this error to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamFailure(_) | Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::UpstreamFailure(_) | Self::Http(_) => "UPSTREAM_FAILURE",
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => "INTERNAL",
        }
    }
}

/// API error envelope: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// Error detail inside the envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        let message = match err {
            Error::NotFound(_) => "Fact not found".to_string(),
            other => other.to_string(),
        };
        Self::new(err.code(), message)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ApiError::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::NotFound("f1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::InvalidTransition {
                id: "f1".into(),
                from: FactStatus::Saved,
                to: FactStatus::Discarded,
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::UpstreamUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            Error::UpstreamFailure("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = Error::InvalidTransition {
            id: "fact-1".into(),
            from: FactStatus::Discarded,
            to: FactStatus::Saved,
        };
        assert_eq!(err.to_string(), "Fact fact-1 is discarded, cannot become saved");
        assert_eq!(err.code(), "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let resp = Error::NotFound("missing".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Fact not found");
    }
}
