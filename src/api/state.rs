//! Application state for the API server

use crate::{Config, ExportProcessor};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the processor instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The main ExportProcessor instance
    pub processor: Arc<ExportProcessor>,

    /// Configuration (for read access by handlers)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(processor: Arc<ExportProcessor>, config: Arc<Config>) -> Self {
        Self { processor, config }
    }
}
