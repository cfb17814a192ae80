//! OpenAPI documentation and schema generation
//!
//! Defines the OpenAPI specification for the docstream REST API using utoipa
//! for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the docstream REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "docstream REST API",
        version = "0.2.0",
        description = "Upload an export archive and receive its extracted documents as a newline-delimited JSON event stream",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        crate::api::routes::upload_archive,
        crate::api::routes::abort_session,
        crate::api::routes::api_info,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::Document,
        crate::types::DocumentId,
        crate::types::TokenUsage,
        crate::types::ProcessingResult,
        crate::types::ProgressCounts,
        crate::types::ProgressData,
        crate::types::StreamEvent,

        // Config types from config.rs
        crate::config::Config,
        crate::config::UploadConfig,
        crate::config::ChunkingConfig,
        crate::config::ApiConfig,

        // Error types from error.rs
        crate::error::ApiError,
    )),
    tags(
        (name = "upload", description = "Archive ingestion - Upload an export archive and stream extracted documents"),
        (name = "system", description = "System endpoints - Info, health checks, abort, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
