//! API route handlers.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

mod system;
mod upload;

// Re-export all handlers so `routes::function_name` continues to work
pub use system::*;
pub use upload::*;

/// Build the structured JSON rejection for a pre-stream error
pub(crate) fn error_response(error: &Error) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::from(error))).into_response()
}
