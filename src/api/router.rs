use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{internal_error_middleware, logging_middleware};
use super::persons;
use super::state::AppState;
use super::types::ApiError;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let environment = state.environment;

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Contacts, also under /api for browser clients
        .nest("/persons", persons::create_persons_router())
        .nest("/api/persons", persons::create_persons_router())
        .fallback(endpoint_not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            environment,
            internal_error_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn endpoint_not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}
