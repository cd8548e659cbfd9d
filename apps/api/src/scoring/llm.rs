//! Optional LLM-backed scoring. Same output shape as the heuristic scorer;
//! any failure degrades to `None` and the caller falls back.

use tracing::warn;

use crate::llm_client::prompts::{bounded_excerpt, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::context::ScoreResult;

/// Resume text sent to the scoring model is capped to bound request size.
const SCORING_EXCERPT_MAX_CHARS: usize = 6000;

const SCORE_PROMPT: &str = r#"Evaluate the following resume text for entry-level software roles.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "score": 0-100 integer,
  "signals": {
    "projects": boolean,
    "internships": boolean,
    "leadership": boolean,
    "impact": boolean,
    "skills": boolean
  },
  "strengths": ["short sentence per genuine strength"],
  "improvements": ["short actionable sentence per gap"]
}

RULES:
1. Judge each signal from evidence in the text only.
2. Keep strengths and improvements to one sentence each.
3. Return ONLY the JSON object, nothing else."#;

/// Asks the model for a [`ScoreResult`]. Returns `None` when no credential is
/// configured or when the call or parse fails; the caller is expected to use
/// the heuristic result instead.
pub async fn llm_score(llm: &LlmClient, text: &str) -> Option<ScoreResult> {
    if !llm.is_configured() {
        return None;
    }

    let prompt = SCORE_PROMPT.replace(
        "{resume_text}",
        bounded_excerpt(text, SCORING_EXCERPT_MAX_CHARS),
    );

    match llm.call_json::<ScoreResult>(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(mut result) => {
            result.score = result.score.min(100);
            Some(result)
        }
        Err(e) => {
            warn!("LLM scoring failed, falling back to heuristic: {e}");
            None
        }
    }
}
