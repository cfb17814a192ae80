//! Configuration types for docstream

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use utoipa::ToSchema;

/// Upload acceptance configuration (size limit, media types)
///
/// Groups settings that gate an upload before the pipeline is invoked.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadConfig {
    /// Maximum upload size in bytes (default: 1 GiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Media types accepted for the archive multipart field
    ///
    /// Only enforced when the client declares a content type on the field.
    #[serde(default = "default_allowed_media_types")]
    pub allowed_media_types: Vec<String>,
}

impl UploadConfig {
    /// Whether a declared media type is on the allow-list
    pub fn allows_media_type(&self, media_type: &str) -> bool {
        self.allowed_media_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_media_types: default_allowed_media_types(),
        }
    }
}

/// Chunked delivery configuration
///
/// Controls how the extracted document list is partitioned for incremental
/// delivery, and when pacing delays are inserted between chunks.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ChunkingConfig {
    /// Chunk size used unless adaptive sizing selects otherwise (default: 50)
    #[serde(default = "default_chunk_size")]
    pub default_chunk_size: usize,

    /// Smaller chunk size used by adaptive sizing for large result sets (default: 25)
    #[serde(default = "default_optimized_chunk_size")]
    pub optimized_chunk_size: usize,

    /// Enable size-adaptive chunking (default: false, the shipped behavior)
    #[serde(default)]
    pub adaptive: bool,

    /// Document count above which adaptive sizing picks the optimized size (default: 100)
    #[serde(default = "default_adaptive_threshold")]
    pub adaptive_threshold: usize,

    /// Document count above which a pacing delay is inserted between chunks (default: 100)
    #[serde(default = "default_pacing_threshold")]
    pub pacing_threshold: usize,

    /// Pacing delay between chunks in milliseconds (default: 100)
    ///
    /// A throughput throttle for large result sets, not a correctness
    /// requirement; tune freely without breaking the protocol.
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,
}

impl ChunkingConfig {
    /// Select the chunk size for a result set
    ///
    /// The selection happens once, before the first event, from the final
    /// document count. It is never recomputed mid-stream.
    pub fn chunk_size_for(&self, total_documents: usize) -> usize {
        if !self.adaptive {
            return self.default_chunk_size;
        }
        if total_documents > self.adaptive_threshold {
            self.optimized_chunk_size
        } else {
            self.default_chunk_size
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: default_chunk_size(),
            optimized_chunk_size: default_optimized_chunk_size(),
            adaptive: false,
            adaptive_threshold: default_adaptive_threshold(),
            pacing_threshold: default_pacing_threshold(),
            pacing_delay_ms: default_pacing_delay_ms(),
        }
    }
}

/// REST API server configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address the API server binds to (default: 127.0.0.1:3001)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS middleware (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; "*" allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve interactive Swagger UI documentation at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for docstream
///
/// Fields are organized into logical sub-configs:
/// - [`upload`](UploadConfig) - upload size limit and media types
/// - [`chunking`](ChunkingConfig) - chunk sizing and pacing
/// - [`server`](ApiConfig) - bind address, CORS, Swagger UI
///
/// Sub-config fields are flattened for flat JSON/TOML serialization.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Upload acceptance settings
    #[serde(flatten)]
    pub upload: UploadConfig,

    /// Chunked delivery settings
    #[serde(flatten)]
    pub chunking: ChunkingConfig,

    /// API server settings
    pub server: ApiConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// Rejects values that would break chunk math or make every upload
    /// unacceptable.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.default_chunk_size == 0 {
            return Err(Error::Config {
                message: "default_chunk_size must be greater than zero".to_string(),
                key: Some("default_chunk_size".to_string()),
            });
        }
        if self.chunking.optimized_chunk_size == 0 {
            return Err(Error::Config {
                message: "optimized_chunk_size must be greater than zero".to_string(),
                key: Some("optimized_chunk_size".to_string()),
            });
        }
        if self.upload.max_file_size == 0 {
            return Err(Error::Config {
                message: "max_file_size must be greater than zero".to_string(),
                key: Some("max_file_size".to_string()),
            });
        }
        Ok(())
    }
}

fn default_max_file_size() -> u64 {
    1024 * 1024 * 1024 // 1 GiB
}

fn default_allowed_media_types() -> Vec<String> {
    vec![
        "application/zip".to_string(),
        "application/x-zip-compressed".to_string(),
        "application/octet-stream".to_string(),
    ]
}

fn default_chunk_size() -> usize {
    50
}

fn default_optimized_chunk_size() -> usize {
    25
}

fn default_adaptive_threshold() -> usize {
    100
}

fn default_pacing_threshold() -> usize {
    100
}

fn default_pacing_delay_ms() -> u64 {
    100
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3001))
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:5174".to_string(),
    ]
}

fn default_true() -> bool {
    true
}
