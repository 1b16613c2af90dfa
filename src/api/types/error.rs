//! API error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

pub const INTERNAL_ERROR: &str = "Internal server error";
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong";

/// JSON error body: `{"error": ..., "message": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Underlying cause of a 500 response, attached as a response extension.
///
/// Only the error middleware decides whether it reaches the client.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                error: error.into(),
                message: None,
            },
            detail: None,
        }
    }

    /// Add a human-readable detail message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.body.message = Some(message.into());
        self
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, error)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::bad_request("Validation Error").with_message(message)
    }

    /// Sanitized 500. The detail is logged and kept out of the body.
    pub fn internal(detail: impl Into<String>) -> Self {
        let mut err = Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            .with_message(INTERNAL_ERROR_MESSAGE);
        err.detail = Some(detail.into());
        err
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(ref detail) = self.detail {
            error!(status = %self.status.as_u16(), detail = %detail, "Request failed");
        }

        let mut response = (self.status, Json(self.body)).into_response();

        if let Some(detail) = self.detail {
            response.extensions_mut().insert(InternalErrorDetail(detail));
        }

        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::BadRequest { message } | DomainError::InvalidId { message } => {
                Self::bad_request(message)
            }
            DomainError::Validation { message } => Self::validation(message),
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Conflict { message } => Self::conflict(message),
            err @ (DomainError::Internal { .. } | DomainError::Storage { .. }) => {
                Self::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_mapping() {
        let cases = [
            (DomainError::bad_request("No updates provided"), StatusCode::BAD_REQUEST),
            (DomainError::invalid_id("Invalid person ID"), StatusCode::BAD_REQUEST),
            (DomainError::validation("Name is required"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("Person not found"), StatusCode::NOT_FOUND),
            (DomainError::conflict("duplicate"), StatusCode::CONFLICT),
            (DomainError::storage("pool timed out"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).status, status);
        }
    }

    #[test]
    fn test_invalid_id_body() {
        let err = ApiError::from(DomainError::invalid_id("Invalid person ID"));

        assert_eq!(err.body.error, "Invalid person ID");
        assert!(err.body.message.is_none());
    }

    #[test]
    fn test_validation_body_carries_message() {
        let err = ApiError::from(DomainError::validation("Name must be at least 3 characters long"));

        assert_eq!(err.body.error, "Validation Error");
        assert_eq!(
            err.body.message.as_deref(),
            Some("Name must be at least 3 characters long")
        );
    }

    #[test]
    fn test_internal_is_sanitized() {
        let err = ApiError::from(DomainError::storage("password authentication failed"));

        assert_eq!(err.body.error, INTERNAL_ERROR);
        assert_eq!(err.body.message.as_deref(), Some(INTERNAL_ERROR_MESSAGE));
        assert!(err.detail().unwrap().contains("password authentication failed"));
    }

    #[test]
    fn test_internal_response_keeps_detail_extension() {
        let response = ApiError::internal("disk full").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<InternalErrorDetail>().unwrap();
        assert_eq!(detail.0, "disk full");
    }

    #[test]
    fn test_body_omits_missing_message() {
        let body = ApiErrorBody {
            error: "Endpoint not found".to_string(),
            message: None,
        };

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Endpoint not found"}"#
        );
    }
}
