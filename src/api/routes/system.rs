//! System handlers: info, health, abort, OpenAPI.

use crate::api::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET / - API information
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "API name, version, and endpoint map")
    )
)]
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "message": "docstream API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/": "GET - API information",
            "/upload": "POST - Upload an export archive and stream extracted documents",
            "/abort": "POST - Abort the active processing session",
            "/health": "GET - Health check",
            "/openapi.json": "GET - OpenAPI specification"
        }
    }))
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// POST /abort - Abort the active processing session
///
/// Exercises the same cancellation path as a client disconnect: the active
/// session's token is cancelled and the in-flight stream terminates with an
/// `aborted` event.
#[utoipa::path(
    post,
    path = "/abort",
    tag = "system",
    responses(
        (status = 202, description = "Abort signalled to the active session"),
        (status = 404, description = "No active session", body = crate::error::ApiError)
    )
)]
pub async fn abort_session(State(state): State<AppState>) -> Response {
    if state.processor.abort_active() {
        (StatusCode::ACCEPTED, Json(json!({"status": "aborting"}))).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("no active session")),
        )
            .into_response()
    }
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}
