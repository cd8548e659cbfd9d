//! Axum route handler for the chat API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub context_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
///
/// Answers a question, grounded in a previously uploaded resume when
/// `contextId` resolves to a stored record. A stale or unknown id degrades
/// to a context-free chat rather than failing.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("message is required".to_string()))?
        .to_string();

    let record = match request.context_id.as_deref() {
        Some(id) => state.store.read(id).await,
        None => None,
    };
    let resume_text = match &record {
        Some(record) => state.store.read_extracted_text(record).await,
        None => None,
    };

    let reply = state
        .responder
        .respond(
            resume_text.as_deref(),
            record.as_ref().map(|r| &r.score),
            &message,
        )
        .await?;

    Ok(Json(ChatResponse { reply }))
}
