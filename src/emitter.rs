//! Chunked event emission
//!
//! Partitions a finished document list into fixed-size chunks and writes the
//! typed event sequence to the session sink: one `metadata` event, then per
//! chunk a `progress` event followed by the `documents_chunk` itself, then
//! exactly one `chunks_complete`. Large result sets are paced with a fixed
//! delay between chunks; the delay is cancellable mid-wait.

use crate::config::ChunkingConfig;
use crate::session::EventSink;
use crate::types::{Document, StreamEvent};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How an emission run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Every chunk was sent, followed by `chunks_complete`
    Completed {
        /// Chunks sent; equals `total_chunks` by construction
        sent_chunks: usize,
        /// Chunks expected
        total_chunks: usize,
    },
    /// Cancellation was observed; no further chunks and no `chunks_complete`
    Cancelled {
        /// Chunks sent before cancellation
        sent_chunks: usize,
    },
}

/// Emits a document list as a paced sequence of chunk events
pub struct ChunkedEmitter {
    chunk_size: usize,
    pacing_threshold: usize,
    pacing_delay: Duration,
}

impl ChunkedEmitter {
    /// Create an emitter for one session
    ///
    /// `chunk_size` must have been selected once, from the final document
    /// count, before any event is written (see
    /// [`ChunkingConfig::chunk_size_for`]).
    pub fn new(chunk_size: usize, chunking: &ChunkingConfig) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            pacing_threshold: chunking.pacing_threshold,
            pacing_delay: Duration::from_millis(chunking.pacing_delay_ms),
        }
    }

    /// Emit the full event sequence for `documents`
    ///
    /// Cancellation is checked before the first event and before each chunk,
    /// and interrupts the inter-chunk pacing delay.
    pub async fn emit(
        &self,
        documents: &[Document],
        sink: &EventSink,
        cancel: &CancellationToken,
    ) -> EmitOutcome {
        let total = documents.len();
        let total_chunks = total.div_ceil(self.chunk_size);

        if cancel.is_cancelled() {
            return EmitOutcome::Cancelled { sent_chunks: 0 };
        }

        sink.send(StreamEvent::Metadata {
            count: total,
            total_chunks,
        });

        let paced = total > self.pacing_threshold;
        let mut sent_chunks = 0;

        for (chunk_index, chunk) in documents.chunks(self.chunk_size).enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(sent_chunks, total_chunks, "emission cancelled");
                return EmitOutcome::Cancelled { sent_chunks };
            }

            let cumulative = chunk_index * self.chunk_size + chunk.len();
            sink.send(StreamEvent::progress(cumulative, total));
            sink.send(StreamEvent::DocumentsChunk {
                chunk: chunk.to_vec(),
                chunk_index,
                total_chunks,
                documents_in_chunk: chunk.len(),
                total,
            });

            sent_chunks += 1;
            tracing::debug!("sent chunk {sent_chunks}/{total_chunks}");

            if paced && sent_chunks < total_chunks {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!(sent_chunks, total_chunks, "emission cancelled during pacing delay");
                        return EmitOutcome::Cancelled { sent_chunks };
                    }
                    _ = tokio::time::sleep(self.pacing_delay) => {}
                }
            }
        }

        sink.send(StreamEvent::ChunksComplete {
            sent_chunks,
            total_chunks,
            total,
        });

        EmitOutcome::Completed {
            sent_chunks,
            total_chunks,
        }
    }
}
