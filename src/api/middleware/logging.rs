//! Request logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::api::types::ApiError;

const MAX_BUFFERED_BODY_BYTES: usize = 1024 * 1024;
const MAX_LOGGED_BODY_CHARS: usize = 500;

/// Log one line per request with method, path, status and duration.
/// Bodies of POST, PUT and PATCH requests are logged truncated.
/// Spans come from `TraceLayer`; this middleware only emits events.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let request = if logs_body(&method) {
        let (parts, body) = request.into_parts();

        let bytes = match axum::body::to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(method = %method, path = %path, error = %e, "Failed to read request body");
                return ApiError::bad_request("Failed to read request body").into_response();
            }
        };

        if !bytes.is_empty() {
            let text = String::from_utf8_lossy(&bytes);
            info!(
                method = %method,
                path = %path,
                body = %truncate_for_log(&text, MAX_LOGGED_BODY_CHARS),
                "Request body"
            );
        }

        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "Request completed"
    );

    response
}

fn logs_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Truncate long strings for logging, on character boundaries
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    let total = s.chars().count();

    if total <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...[truncated {} chars]", head, total - max_chars)
    }
}
