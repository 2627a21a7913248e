use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use serde::Serialize;
use thiserror::Error;

use crate::llm::LlmError;
use crate::models::chat::ErrorResponse;

pub const INVALID_REQUEST: &str = "Invalid request data";
pub const UPSTREAM_ERROR: &str = "Upstream provider error";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid request: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    Configuration(String),

    #[error("upstream provider returned status {status}")]
    Upstream {
        status: u16,
        payload: serde_json::Value,
    },

    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl From<LlmError> for RelayError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey(_) => RelayError::Configuration(err.to_string()),
            LlmError::Status { status, payload } => RelayError::Upstream { status, payload },
            other => RelayError::Unknown(other.to_string()),
        }
    }
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-visible body. `Unknown` never carries internal detail.
    pub fn to_body(&self) -> ErrorResponse {
        match self {
            RelayError::Validation(violations) =>
                ErrorResponse {
                    error: INVALID_REQUEST.to_string(),
                    details: serde_json::to_value(violations).ok(),
                },
            RelayError::Configuration(message) =>
                ErrorResponse {
                    error: message.clone(),
                    details: None,
                },
            RelayError::Upstream { payload, .. } =>
                ErrorResponse {
                    error: UPSTREAM_ERROR.to_string(),
                    details: Some(payload.clone()),
                },
            RelayError::Unknown(_) =>
                ErrorResponse {
                    error: INTERNAL_ERROR.to_string(),
                    details: None,
                },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderType;
    use serde_json::json;

    #[test]
    fn validation_maps_to_bad_request_with_details() {
        let err = RelayError::Validation(vec![FieldViolation::new("message", "Message cannot be empty")]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.to_body();
        assert_eq!(body.error, INVALID_REQUEST);
        assert_eq!(body.details.unwrap()[0]["field"], "message");
    }

    #[test]
    fn upstream_status_keeps_provider_payload() {
        let err: RelayError = (LlmError::Status {
            status: 429,
            payload: json!({"error": {"message": "quota exceeded"}}),
        }).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.to_body();
        assert_eq!(body.error, UPSTREAM_ERROR);
        assert_eq!(body.details.unwrap()["error"]["message"], "quota exceeded");
    }

    #[test]
    fn missing_key_becomes_configuration_error() {
        let err: RelayError = LlmError::MissingApiKey(ProviderType::Gemini).into();
        assert!(matches!(err, RelayError::Configuration(_)));
        assert_eq!(err.to_body().error, "Gemini API key not configured.");
    }

    #[test]
    fn unknown_hides_internal_detail() {
        let body = RelayError::Unknown("connection refused at 10.0.0.3".into()).to_body();
        assert_eq!(body.error, INTERNAL_ERROR);
        assert!(body.details.is_none());
    }
}
