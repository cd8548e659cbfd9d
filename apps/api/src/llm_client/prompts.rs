// Cross-cutting prompt utilities.
// Each service that needs LLM calls defines its own prompts alongside it
// (scoring/llm.rs, chat/prompts.rs); this file holds the shared fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Truncates `text` to at most `max_chars` characters, respecting char
/// boundaries. Used to bound prompt sizes before hitting the API.
pub fn bounded_excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
