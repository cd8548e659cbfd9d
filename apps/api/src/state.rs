use std::sync::Arc;

use crate::chat::ChatResponder;
use crate::extract::TextExtractor;
use crate::llm_client::LlmClient;
use crate::store::ContextStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub extractor: Arc<TextExtractor>,
    pub store: ContextStore,
    pub responder: ChatResponder,
}
