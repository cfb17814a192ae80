//! REST API server module
//!
//! Exposes the upload-and-stream pipeline over HTTP: a multipart upload
//! endpoint answering with a newline-delimited JSON event stream, an abort
//! endpoint wired to the active session's cancellation token, and the usual
//! service plumbing (info, health, OpenAPI).

use crate::{Config, ExportProcessor, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Extra body headroom above the configured upload limit
///
/// Covers multipart boundary and header framing so the handler itself, not
/// the body-limit layer, performs the structured too-large rejection.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Create the API router with all route definitions
///
/// # Routes
///
/// - `GET /` - API information
/// - `POST /upload` - Upload an export archive, respond with an event stream
/// - `POST /abort` - Abort the active processing session
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive documentation (if enabled)
pub fn create_router(processor: Arc<ExportProcessor>, config: Arc<Config>) -> Router {
    let state = AppState::new(processor, config.clone());

    let router = Router::new()
        .route("/", get(routes::api_info))
        .route("/upload", post(routes::upload_archive))
        .route("/abort", post(routes::abort_session))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // Merge Swagger UI routes if enabled in config (before applying state)
    let router = if config.server.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state);

    // Body limit sized so the handler can reject oversize uploads with a
    // structured payload instead of the layer's bare 413
    let body_limit = usize::try_from(config.upload.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_LIMIT_SLACK);
    let router = router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.server.cors_enabled {
        let cors = build_cors_layer(&config.server.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// # Arguments
///
/// * `origins` - List of allowed origins (supports "*" for any origin)
///
/// # Returns
///
/// A configured CorsLayer that allows the specified origins, all methods,
/// and all headers for cross-origin requests.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    // Check if "*" (all origins) is in the list
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        // Allow all origins (default for local development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow specific origins
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Binds a TCP listener, serves the router, and runs until an error or a
/// termination signal. On shutdown any active session is aborted so the
/// in-flight stream terminates cleanly.
///
/// # Example
///
/// ```no_run
/// use docstream::{Config, ExportProcessor};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let processor = Arc::new(ExportProcessor::new((*config).clone())?);
///
/// // Start API server (blocks until shutdown)
/// docstream::api::start_api_server(processor, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(
    processor: Arc<ExportProcessor>,
    config: Arc<Config>,
) -> Result<()> {
    let bind_address = config.server.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(processor.clone(), config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(processor))
        .await
        .map_err(|e| crate::error::Error::ApiServer(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

/// Wait for a termination signal, then abort any active session
async fn shutdown_signal(processor: Arc<ExportProcessor>) {
    crate::wait_for_signal().await;
    if processor.abort_active() {
        tracing::info!("aborted active session for shutdown");
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
