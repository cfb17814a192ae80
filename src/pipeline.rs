//! Extraction pipeline
//!
//! Drives the archive reader and document extractor over every HTML member
//! of an uploaded archive, producing an ordered [`ProcessingResult`]. The
//! pipeline observes a cancellation token at each iteration boundary and
//! reports progress and diagnostics through a [`PipelineObserver`].

use crate::archive::ArchiveReader;
use crate::error::Result;
use crate::extract::DocumentExtractor;
use crate::session::EventSink;
use crate::types::{ProcessingResult, StreamEvent, TokenUsage};
use tokio_util::sync::CancellationToken;

/// Suffix that marks an archive member as an extractable document
const DOCUMENT_SUFFIX: &str = ".html";

/// Observer for pipeline diagnostics and progress
///
/// Core logic only ever talks to this interface; wiring decides where the
/// events go. The stream-facing implementation mirrors everything to the
/// server console as well, so operators can follow a session without a
/// client attached.
pub trait PipelineObserver: Send + Sync {
    /// Called with diagnostic log lines (pipeline start, degraded members)
    fn on_log(&self, message: &str);

    /// Called after each processed member with the running count and total
    fn on_progress(&self, current: usize, total: usize);
}

/// Observer that forwards to a client [`EventSink`] and mirrors to tracing
pub struct StreamObserver {
    sink: EventSink,
}

impl StreamObserver {
    /// Create an observer that writes to the given sink
    pub fn new(sink: EventSink) -> Self {
        Self { sink }
    }
}

impl PipelineObserver for StreamObserver {
    fn on_log(&self, message: &str) {
        tracing::info!("{message}");
        self.sink.send(StreamEvent::log(message));
    }

    fn on_progress(&self, current: usize, total: usize) {
        let percentage = if total == 0 {
            100.0
        } else {
            current as f64 / total as f64 * 100.0
        };
        tracing::debug!("processing: {current}/{total} members ({percentage:.1}%)");
        self.sink.send(StreamEvent::progress(current, total));
    }
}

/// How a pipeline run ended
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Every qualifying member was processed
    Completed(ProcessingResult),
    /// Cancellation was observed; holds whatever had accumulated
    ///
    /// The caller must treat this as an aborted session, not a completed one.
    Cancelled(ProcessingResult),
}

impl PipelineOutcome {
    /// The result carried by either outcome
    pub fn result(&self) -> &ProcessingResult {
        match self {
            PipelineOutcome::Completed(result) | PipelineOutcome::Cancelled(result) => result,
        }
    }
}

/// Drives extraction over all HTML members of an archive
pub struct ExtractionPipeline {
    extractor: DocumentExtractor,
}

impl ExtractionPipeline {
    /// Create a pipeline with a fresh extractor
    pub fn new() -> Self {
        Self {
            extractor: DocumentExtractor::new(),
        }
    }

    /// Run extraction over an archive buffer
    ///
    /// Fails only when the archive itself cannot be opened. Member-local
    /// failures are logged through the observer and skipped. Cancellation is
    /// checked before each member; once observed, no further members are
    /// processed and the accumulated partial result is returned as
    /// [`PipelineOutcome::Cancelled`].
    pub fn run(
        &self,
        archive: &[u8],
        cancel: &CancellationToken,
        observer: &dyn PipelineObserver,
    ) -> Result<PipelineOutcome> {
        let mut reader = ArchiveReader::open(archive)?;

        // Pre-scan so the qualifying-member total is known before iteration
        let mut targets = Vec::new();
        for index in 0..reader.len() {
            match reader.entry_meta(index) {
                Ok(meta) if !meta.is_dir && meta.name.ends_with(DOCUMENT_SUFFIX) => {
                    targets.push(index);
                }
                Ok(_) => {}
                Err(e) => {
                    observer.on_log(&format!("skipping unreadable archive member {index}: {e}"));
                }
            }
        }

        let total = targets.len();
        observer.on_log(&format!(
            "extracting {total} HTML member(s) from archive with {} entries",
            reader.len()
        ));

        let mut documents = Vec::with_capacity(total);
        let mut processed = 0;
        for &index in &targets {
            if cancel.is_cancelled() {
                tracing::info!(processed, total, "extraction cancelled");
                return Ok(PipelineOutcome::Cancelled(ProcessingResult {
                    documents,
                    token_usage: TokenUsage::default(),
                }));
            }

            match reader.read_entry(index) {
                Ok(entry) => {
                    let document = self.extractor.extract(&entry.data, entry.file_name());
                    documents.push(document);
                }
                Err(e) => {
                    // Degraded, not fatal: one bad member never aborts the archive
                    observer.on_log(&format!("failed to read archive member {index}: {e}"));
                }
            }
            processed += 1;
            observer.on_progress(processed, total);
        }

        Ok(PipelineOutcome::Completed(ProcessingResult {
            documents,
            token_usage: TokenUsage::default(),
        }))
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}
