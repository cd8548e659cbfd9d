//! Chat over an uploaded resume's extracted text.
//!
//! Without a configured credential the responder returns a clearly marked
//! placeholder built from the constructed prompt instead of pretending to be
//! a model. API failures surface as a generic chat error and are not retried.

pub mod handlers;
pub mod prompts;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::context::ScoreResult;

use self::prompts::{build_system_prompt, build_user_prompt};

#[derive(Clone)]
pub struct ChatResponder {
    llm: LlmClient,
}

impl ChatResponder {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Answers `message`, grounded in the resume text and score when a
    /// context is available.
    pub async fn respond(
        &self,
        resume_text: Option<&str>,
        score: Option<&ScoreResult>,
        message: &str,
    ) -> Result<String, AppError> {
        let system = build_system_prompt(score);
        let user = build_user_prompt(resume_text, message);

        if !self.llm.is_configured() {
            return Ok(placeholder_reply(&system, &user));
        }

        let response = self.llm.call(&user, &system).await.map_err(|e| {
            tracing::error!("chat generation failed: {e}");
            AppError::Llm("chat generation failed".to_string())
        })?;
        response
            .text()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Llm("chat generation returned no text".to_string()))
    }
}

/// Dev-mode reply used when no generation API key is configured. Shows the
/// prompt that would have been sent so the flow stays exercisable offline.
fn placeholder_reply(system: &str, user: &str) -> String {
    format!(
        "[dev mode: no generation API key configured]\n\
         The assistant would have been called with:\n\
         --- system ---\n{system}\n--- user ---\n{user}"
    )
}
