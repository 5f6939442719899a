use crate::domain::DomainError;
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use tracing::error;

/// Failure body shared by every endpoint
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Convert domain error to HTTP status and failure body
pub fn domain_error_to_response(error: DomainError) -> (StatusCode, ErrorBody) {
    match error {
        DomainError::AnimalNotFound(msg)
        | DomainError::PhotoNotFound(msg)
        | DomainError::MedicalRecordNotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),

        DomainError::AnimalAlreadyExists(chip_id) => (
            StatusCode::CONFLICT,
            ErrorBody::new(format!("Animal already exists: {}", chip_id)),
        ),

        DomainError::ValidationError(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),

        DomainError::RepositoryError(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new(format!("Internal error: {}", err)),
        ),
    }
}

/// Handler error type; renders the failure shape with the mapped status
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = domain_error_to_response(self.0);
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %body.error, "request failed");
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                DomainError::ValidationError("chip id is required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::AnimalNotFound("Animal not found".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::PhotoNotFound("Photo not found: 3".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::MedicalRecordNotFound("Medical record not found: 8".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::AnimalAlreadyExists("123456789012345".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::RepositoryError(anyhow::anyhow!("connection reset")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let (status, body) = domain_error_to_response(error);
            assert_eq!(status, expected);
            assert!(!body.success);
        }
    }

    #[test]
    fn test_validation_message_passes_through() {
        let (_, body) =
            domain_error_to_response(DomainError::ValidationError("chip id is required".into()));
        assert_eq!(body.error, "chip id is required");
    }

    #[test]
    fn test_body_shape() {
        let json = serde_json::to_value(ErrorBody::new("Animal not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "Animal not found" })
        );
    }
}
