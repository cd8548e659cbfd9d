// Chat prompt templates and builders.
// All prompts for the chat module are defined here.

use crate::llm_client::prompts::bounded_excerpt;
use crate::models::context::ScoreResult;

/// Resume text included in a chat turn is capped to control request size.
pub const RESUME_EXCERPT_MAX_CHARS: usize = 4000;

const SYSTEM_PREAMBLE: &str = "\
You are a concise, encouraging career coach. Answer the user's question \
directly. When a resume is provided, ground every suggestion in its actual \
content; never invent experience the user does not have.";

/// Builds the system instruction, embedding the numeric score and the
/// signal summary when a scored resume context is available.
pub fn build_system_prompt(score: Option<&ScoreResult>) -> String {
    let mut prompt = SYSTEM_PREAMBLE.to_string();
    if let Some(score) = score {
        let signal_summary = score
            .signals
            .iter()
            .map(|(name, hit)| format!("{name}: {}", if *hit { "yes" } else { "no" }))
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!(
            "\n\nThe user's resume scored {}/100. Signals: {signal_summary}.",
            score.score
        ));
    }
    prompt
}

/// Builds the user turn: the question, preceded by a bounded resume excerpt
/// when one is available.
pub fn build_user_prompt(resume_text: Option<&str>, message: &str) -> String {
    match resume_text {
        Some(text) if !text.trim().is_empty() => format!(
            "RESUME EXCERPT:\n{}\n\nQUESTION:\n{}",
            bounded_excerpt(text, RESUME_EXCERPT_MAX_CHARS),
            message
        ),
        _ => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::heuristic_score;

    #[test]
    fn test_system_prompt_embeds_score_and_signals() {
        let score = heuristic_score("Built projects. Led the robotics team.");
        let prompt = build_system_prompt(Some(&score));
        assert!(prompt.contains(&format!("{}/100", score.score)));
        assert!(prompt.contains("projects: yes"));
        assert!(prompt.contains("internships: no"));
    }

    #[test]
    fn test_system_prompt_without_context_has_no_score() {
        let prompt = build_system_prompt(None);
        assert!(!prompt.contains("/100"));
    }

    #[test]
    fn test_user_prompt_includes_message_and_excerpt() {
        let prompt = build_user_prompt(Some("resume body"), "how do I improve?");
        assert!(prompt.contains("resume body"));
        assert!(prompt.contains("how do I improve?"));
    }

    #[test]
    fn test_user_prompt_caps_resume_excerpt() {
        let long_resume = "x".repeat(10_000);
        let prompt = build_user_prompt(Some(&long_resume), "question");
        assert!(prompt.len() < 4200);
        assert!(prompt.contains("question"));
    }

    #[test]
    fn test_user_prompt_without_resume_is_just_the_message() {
        assert_eq!(build_user_prompt(None, "hello"), "hello");
        assert_eq!(build_user_prompt(Some("   "), "hello"), "hello");
    }
}
