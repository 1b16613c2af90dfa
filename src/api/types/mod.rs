//! API request and response types

pub mod error;
pub mod json;
pub mod person;

pub use error::{ApiError, ApiErrorBody, InternalErrorDetail};
pub use json::Json;
pub use person::{PersonBody, PersonResponse, SearchParams};
