//! Internal error exposure

use axum::{
    Json,
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::types::{ApiErrorBody, InternalErrorDetail};
use crate::api::types::error::INTERNAL_ERROR;
use crate::config::Environment;

/// In development, replace the sanitized 500 message with the underlying error
pub async fn internal_error_middleware(
    State(environment): State<Environment>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(InternalErrorDetail(detail)) = response.extensions_mut().remove::<InternalErrorDetail>()
    else {
        return response;
    };

    if !environment.is_development() {
        return response;
    }

    let body = ApiErrorBody {
        error: INTERNAL_ERROR.to_string(),
        message: Some(detail),
    };

    (response.status(), Json(body)).into_response()
}
