//! # docstream
//!
//! Backend library for turning an uploaded export archive into a stream of
//! structured documents.
//!
//! ## Design Philosophy
//!
//! docstream is designed to be:
//! - **Incremental** - Extracted documents are delivered in chunks over a
//!   long-lived connection, not as one giant payload
//! - **Cancellable** - Client disconnects and explicit aborts stop in-flight
//!   work cooperatively, at well-defined checkpoints
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Degradation-friendly** - One malformed archive member never takes
//!   down the whole extraction
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstream::{Config, ExportProcessor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let processor = Arc::new(ExportProcessor::new(config.clone())?);
//!
//!     // Serve POST /upload and friends until shutdown
//!     docstream::api::start_api_server(processor, Arc::new(config)).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// In-memory archive decoding
pub mod archive;
/// Configuration types
pub mod config;
/// Chunked event emission
pub mod emitter;
/// Error types
pub mod error;
/// HTML document extraction
pub mod extract;
/// Extraction pipeline and observers
pub mod pipeline;
/// Core processor implementation
pub mod processor;
/// Session lifecycle and event delivery
pub mod session;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use archive::{ArchiveEntry, ArchiveReader, EntryMeta};
pub use config::{ApiConfig, ChunkingConfig, Config, UploadConfig};
pub use emitter::{ChunkedEmitter, EmitOutcome};
pub use error::{ApiError, Error, Result, ToHttpStatus};
pub use extract::DocumentExtractor;
pub use pipeline::{ExtractionPipeline, PipelineObserver, PipelineOutcome, StreamObserver};
pub use processor::ExportProcessor;
pub use session::{EventSink, SessionController, SessionGuard};
pub use types::{
    Document, DocumentId, ProcessingResult, ProgressCounts, ProgressData, StreamEvent, TokenUsage,
};

/// Wait for a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, falling back to `ctrl_c` if
///   signal registration fails (containers, restricted test environments).
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub(crate) async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        _ => {
            tracing::warn!("Could not register signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Wait for a termination signal (Ctrl+C on non-Unix platforms).
#[cfg(not(unix))]
pub(crate) async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
