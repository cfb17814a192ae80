//! Core types for docstream

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for an extracted document
///
/// Generated at extraction time, never reused. Re-running extraction on the
/// same archive yields the same document order but fresh identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    /// Generate a new random DocumentId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner Uuid value
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// One extracted unit of content
///
/// Field values are immutable once extraction completes. The `summary`,
/// `tags`, `source_url`, and `related_documents` fields are reserved for a
/// later enrichment stage and stay empty at extraction time.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Document {
    /// Unique identifier, generated at extraction time
    pub document_id: DocumentId,

    /// Title from the member's title element, or the member file name if absent
    pub title: String,

    /// Concatenated visible body text, no markup
    pub content: String,

    /// Reserved for AI summarization; empty at extraction time
    pub summary: String,

    /// Reserved for AI tagging; empty at extraction time
    pub tags: Vec<String>,

    /// Reserved; empty at extraction time
    pub source_url: String,

    /// Reserved; absent (null) at extraction time
    pub related_documents: Option<Vec<DocumentId>>,

    /// Extraction timestamp (not sourced from archive metadata)
    pub last_edited_time: DateTime<Utc>,
}

/// Token usage accounting for the enrichment stage
///
/// All counts are zero while enrichment is unimplemented; they must not be
/// fabricated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenUsage {
    /// Total tokens consumed
    pub total: u64,
    /// Tokens consumed generating summaries
    pub summaries: u64,
    /// Tokens consumed generating tags
    pub tags: u64,
}

/// Output of the extraction pipeline
///
/// Document order matches archive member enumeration order.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcessingResult {
    /// Extracted documents, in archive member order
    pub documents: Vec<Document>,

    /// Enrichment token accounting (all zero for now)
    pub token_usage: TokenUsage,
}

/// Extraction progress counters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProgressCounts {
    /// Documents processed so far
    pub current: usize,
    /// Total documents expected
    pub total: usize,
}

/// Payload wrapper for `progress` events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProgressData {
    /// The progress counters
    pub progress: ProgressCounts,
}

/// Event written to the client stream during a session
///
/// Serialized as newline-delimited JSON, one event per line, discriminated by
/// the `type` field. For a single session the order is: zero or more `log`
/// and extraction-phase `progress` events, one `metadata`, then per chunk a
/// `progress` followed by its `documents_chunk`, then exactly one terminal
/// event (`chunks_complete`, `aborted`, or `error`).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Diagnostic log line, mirrored to the server console
    Log {
        /// The log message
        message: String,
    },

    /// Progress update (extraction phase and per-chunk)
    Progress {
        /// Progress payload
        data: ProgressData,
    },

    /// Result-set metadata, sent once before any chunk
    #[serde(rename_all = "camelCase")]
    Metadata {
        /// Total number of extracted documents
        count: usize,
        /// Total number of chunks that will be sent
        total_chunks: usize,
    },

    /// One chunk of the extracted document list
    #[serde(rename_all = "camelCase")]
    DocumentsChunk {
        /// The documents in this chunk
        chunk: Vec<Document>,
        /// Zero-based chunk index
        chunk_index: usize,
        /// Total number of chunks
        total_chunks: usize,
        /// Number of documents in this chunk
        documents_in_chunk: usize,
        /// Total number of documents across all chunks
        total: usize,
    },

    /// Terminal event for a successful session
    #[serde(rename_all = "camelCase")]
    ChunksComplete {
        /// Chunks actually sent; must equal `total_chunks` on success
        sent_chunks: usize,
        /// Chunks expected
        total_chunks: usize,
        /// Total number of documents delivered
        total: usize,
    },

    /// Terminal event for a session that failed after the stream opened
    Error {
        /// The error message
        message: String,
    },

    /// Terminal event for a cancelled session
    Aborted,
}

impl StreamEvent {
    /// Create a log event
    pub fn log(message: impl Into<String>) -> Self {
        StreamEvent::Log {
            message: message.into(),
        }
    }

    /// Create a progress event
    pub fn progress(current: usize, total: usize) -> Self {
        StreamEvent::Progress {
            data: ProgressData {
                progress: ProgressCounts { current, total },
            },
        }
    }

    /// Create an error event
    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
        }
    }

    /// The wire-level discriminant of this event
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Log { .. } => "log",
            StreamEvent::Progress { .. } => "progress",
            StreamEvent::Metadata { .. } => "metadata",
            StreamEvent::DocumentsChunk { .. } => "documents_chunk",
            StreamEvent::ChunksComplete { .. } => "chunks_complete",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Aborted => "aborted",
        }
    }

    /// Whether this event terminates the session stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::ChunksComplete { .. } | StreamEvent::Error { .. } | StreamEvent::Aborted
        )
    }
}
