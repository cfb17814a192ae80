//! Core export processor
//!
//! [`ExportProcessor`] owns the configuration and the single-session
//! controller, and drives one upload through extraction and chunked
//! emission. It is the only component that writes terminal events, which is
//! what guarantees exactly one terminal event per session.

use crate::config::Config;
use crate::emitter::{ChunkedEmitter, EmitOutcome};
use crate::error::Result;
use crate::pipeline::{ExtractionPipeline, PipelineOutcome, StreamObserver};
use crate::session::{EventSink, SessionController, SessionGuard};
use crate::types::StreamEvent;
use bytes::Bytes;
use std::sync::Arc;

/// Main processor instance (cloneable, all fields are Arc-wrapped)
#[derive(Clone)]
pub struct ExportProcessor {
    /// Configuration (wrapped in Arc for sharing across tasks)
    config: Arc<Config>,
    /// Single active-session arbiter
    sessions: Arc<SessionController>,
}

impl ExportProcessor {
    /// Create a new ExportProcessor instance
    ///
    /// Validates the configuration up front; an invalid chunk or upload
    /// configuration is rejected here rather than mid-session.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionController::new()),
        })
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Begin a new session, preempting any live one
    ///
    /// The returned guard carries the session's cancellation token and
    /// releases the session slot when dropped.
    pub fn begin_session(&self) -> SessionGuard {
        self.sessions.begin()
    }

    /// Cancel the active session, if any
    ///
    /// Used by the abort endpoint and by graceful shutdown. Returns false
    /// when no session is live.
    pub fn abort_active(&self) -> bool {
        self.sessions.abort_active()
    }

    /// Whether a session is currently live
    pub fn has_active_session(&self) -> bool {
        self.sessions.is_active()
    }

    /// Run one session to its terminal event
    ///
    /// Extraction and emission write progress through `sink`; this method
    /// writes the terminal event (`chunks_complete` comes from the emitter
    /// on success, `aborted` and `error` from here). Dropping the guard on
    /// return releases the session slot.
    pub async fn run_session(&self, archive: Bytes, sink: EventSink, guard: SessionGuard) {
        let session = guard.id();
        let cancel = guard.cancel_token().clone();
        let observer = StreamObserver::new(sink.clone());
        let pipeline = ExtractionPipeline::new();

        match pipeline.run(archive.as_ref(), &cancel, &observer) {
            Err(e) => {
                // The stream is already open, so no HTTP-level error response
                // is possible: log server-side and terminate with an error event
                tracing::error!(session, error = %e, "extraction failed mid-session");
                sink.send(StreamEvent::error(e.to_string()));
            }
            Ok(PipelineOutcome::Cancelled(partial)) => {
                tracing::info!(
                    session,
                    documents = partial.documents.len(),
                    "session aborted during extraction"
                );
                sink.send(StreamEvent::Aborted);
            }
            Ok(PipelineOutcome::Completed(result)) => {
                let chunk_size = self.config.chunking.chunk_size_for(result.documents.len());
                let emitter = ChunkedEmitter::new(chunk_size, &self.config.chunking);

                match emitter.emit(&result.documents, &sink, &cancel).await {
                    EmitOutcome::Cancelled { sent_chunks } => {
                        tracing::info!(session, sent_chunks, "session aborted during emission");
                        sink.send(StreamEvent::Aborted);
                    }
                    EmitOutcome::Completed {
                        sent_chunks,
                        total_chunks,
                    } => {
                        tracing::info!(
                            session,
                            sent_chunks,
                            total_chunks,
                            documents = result.documents.len(),
                            "session complete"
                        );
                    }
                }
            }
        }
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server runs concurrently with session processing and listens on
    /// the configured bind address.
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let processor = Arc::clone(self);
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(processor, config).await })
    }
}
