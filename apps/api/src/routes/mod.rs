pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::chat::handlers::handle_chat;
use crate::state::AppState;
use crate::upload::handlers::handle_upload_resume;

/// Uploads are resumes: a few hundred KB of text, but page scans can be
/// heavy, so the default 2 MB body limit is raised.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/upload-resume", post(handle_upload_resume))
        .route("/api/chat", post(handle_chat))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
