use thiserror::Error;

use super::person::PersonValidationError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// The message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::NotFound { message }
            | Self::Validation { message }
            | Self::InvalidId { message }
            | Self::Conflict { message }
            | Self::Internal { message }
            | Self::Storage { message } => message,
        }
    }
}

impl From<PersonValidationError> for DomainError {
    fn from(err: PersonValidationError) -> Self {
        match err {
            PersonValidationError::InvalidId => Self::invalid_id(err.to_string()),
            _ => Self::validation(err.to_string()),
        }
    }
}
