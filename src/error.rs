//! Error types for docstream
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error variants (archive, upload, session)
//! - HTTP status code mapping for the API layer
//! - The structured JSON error body returned before a stream opens

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for docstream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for docstream
///
/// Failures local to one archive member never appear here; those are logged
/// and extraction continues. Variants in this enum abort the whole session.
#[derive(Debug, Error)]
pub enum Error {
    /// The uploaded buffer is not a valid archive container
    #[error("corrupt archive: {0}")]
    ArchiveCorrupt(String),

    /// The upload request carried no archive payload
    #[error("no archive file provided")]
    NoFileProvided,

    /// The uploaded archive exceeds the configured size limit
    #[error("upload of {size} bytes exceeds the {limit} byte limit")]
    UploadTooLarge {
        /// Size of the rejected upload in bytes
        size: u64,
        /// The configured maximum upload size in bytes
        limit: u64,
    },

    /// The upload declared a media type outside the configured allow-list
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Cancellation was observed mid-pipeline
    ///
    /// Not an error from the client's point of view; the session terminates
    /// with an `aborted` stream event rather than an `error` event.
    #[error("session cancelled")]
    Cancelled,

    /// A write was attempted on a sink already closed by client disconnect
    #[error("event sink closed")]
    SinkClosed,

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "default_chunk_size")
        key: Option<String>,
    },

    /// API server error
    #[error("API server error: {0}")]
    ApiServer(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Structured JSON error body
///
/// Returned by the API for requests rejected before any stream byte has been
/// written. Once streaming has begun, errors surface only as `error` or
/// `aborted` stream events.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": "corrupt archive: invalid Zip archive",
///   "details": "ensure the upload is a valid export archive (ZIP)"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,

    /// Optional hint with additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Create a new API error body
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Create an API error body with a details hint
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

impl From<&Error> for ApiError {
    fn from(error: &Error) -> Self {
        match error {
            Error::ArchiveCorrupt(_) => ApiError::with_details(
                error.to_string(),
                "ensure the upload is a valid export archive (ZIP)",
            ),
            Error::UploadTooLarge { limit, .. } => ApiError::with_details(
                "file too large",
                format!("maximum allowed size is {} MB", limit / (1024 * 1024)),
            ),
            _ => ApiError::new(error.to_string()),
        }
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 4xx - Client errors, rejected before the stream opens
            Error::NoFileProvided => 400,
            Error::Config { .. } => 400,
            Error::Cancelled => 409,
            Error::UploadTooLarge { .. } => 413,
            Error::UnsupportedMediaType(_) => 415,
            Error::ArchiveCorrupt(_) => 422, // Unprocessable Entity

            // 500 Internal Server Error - Server-side issues
            Error::SinkClosed => 500,
            Error::ApiServer(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::ArchiveCorrupt(_) => "archive_corrupt",
            Error::NoFileProvided => "no_file_provided",
            Error::UploadTooLarge { .. } => "upload_too_large",
            Error::UnsupportedMediaType(_) => "unsupported_media_type",
            Error::Cancelled => "cancelled",
            Error::SinkClosed => "sink_closed",
            Error::Config { .. } => "config_error",
            Error::ApiServer(_) => "api_server_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}
