use std::sync::Arc;

use crate::providers::ExtractionClient;
use crate::session::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable résumé record store. Default: in-memory, process lifetime.
    pub store: Arc<dyn ResumeStore>,
    pub llm: ExtractionClient,
}
