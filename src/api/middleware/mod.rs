//! API middleware components

pub mod errors;
pub mod logging;

pub use errors::internal_error_middleware;
pub use logging::{logging_middleware, truncate_for_log};
