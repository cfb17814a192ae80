//! REST API server example
//!
//! Runs docstream with the REST API enabled, ready to accept archive
//! uploads and stream extracted documents back.
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:3001/swagger-ui
//! - Upload an archive via POST http://localhost:3001/upload
//! - Abort the active session via POST http://localhost:3001/abort

use docstream::config::{ApiConfig, ChunkingConfig, Config};
use docstream::{ExportProcessor, api::start_api_server};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let config = Config {
        chunking: ChunkingConfig {
            // Flip on size-adaptive chunking to see smaller chunks for
            // large exports
            adaptive: false,
            ..Default::default()
        },
        server: ApiConfig {
            bind_address: "127.0.0.1:3001".parse::<SocketAddr>()?,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
            swagger_ui: true,
        },
        ..Default::default()
    };

    let processor = Arc::new(ExportProcessor::new(config.clone())?);
    let config_arc = Arc::new(config);

    println!("Starting docstream REST API server");
    println!("Swagger UI: http://localhost:3001/swagger-ui");
    println!();
    println!("Example commands:");
    println!("  # Upload an export archive and stream extracted documents");
    println!("  curl -N -X POST http://localhost:3001/upload \\");
    println!("    -F 'archive=@export.zip;type=application/zip'");
    println!();
    println!("  # Abort the active session from another terminal");
    println!("  curl -X POST http://localhost:3001/abort");

    // Start the API server (runs until SIGTERM/SIGINT)
    start_api_server(processor, config_arc).await?;

    Ok(())
}
