// src/state.rs

use std::sync::Arc;

use crate::chat::ChatOrchestrator;
use crate::extract::PdfExtractor;
use crate::llm::LlmProvider;

/// Shared server state. Everything in here is immutable after startup;
/// requests never share any mutable state.
pub struct AppState {
    pub orchestrator: ChatOrchestrator,
}

impl AppState {
    pub fn new(provider: Arc<dyn LlmProvider>, extractor: PdfExtractor) -> Self {
        Self {
            orchestrator: ChatOrchestrator::new(provider, extractor),
        }
    }
}
