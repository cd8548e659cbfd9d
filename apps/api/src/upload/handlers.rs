//! Axum route handler for the resume upload pipeline:
//! save raw file, extract text, score, analyze, persist the context record.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::analysis::analyze;
use crate::errors::AppError;
use crate::models::context::{AnalysisReport, ContextRecord};
use crate::scoring::{self, heuristic_score};
use crate::state::AppState;
use crate::store::ContextStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub context_id: String,
    pub score: u32,
    pub signals: BTreeMap<String, bool>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub report: AnalysisReport,
}

/// POST /api/upload-resume
///
/// Expects a multipart body with a `file` field (pdf/png/jpg/jpeg/webp;
/// anything else is read as plain text by the extractor). Extraction never
/// fails the request; scoring falls back to the heuristic when the LLM
/// scorer is unavailable.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("resume").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read uploaded file: {e}")))?;
            file = Some((original_name, data));
            break;
        }
    }

    let (original_name, data) = file.ok_or_else(|| {
        AppError::Validation("no file uploaded; expected multipart field 'file'".to_string())
    })?;
    if data.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    let stored_name = ContextStore::allocate_name(&original_name);
    let stored_path = state.store.save_upload(&stored_name, data).await?;
    let extension = extension_of(&stored_name);

    info!(file = %stored_name, "processing uploaded resume");
    let text = state.extractor.extract(&stored_path, &extension).await;

    let score = match scoring::llm::llm_score(&state.llm, &text).await {
        Some(score) => score,
        None => heuristic_score(&text),
    };
    let report = analyze(&text, &score);

    let record = ContextRecord {
        context_id: stored_name.clone(),
        extracted_file: format!("{stored_name}.txt"),
        extracted_text_length: text.chars().count(),
        score,
        report,
        created_at: Utc::now(),
    };
    let context_id = state.store.write(&record, &text).await?;

    Ok(Json(UploadResponse {
        context_id,
        score: record.score.score,
        signals: record.score.signals,
        strengths: record.score.strengths,
        improvements: record.score.improvements,
        report: record.report,
    }))
}

/// Lowercased extension of a file name; empty when there is none.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}
