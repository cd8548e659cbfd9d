//! Deterministic resume readiness scoring.
//!
//! Five boolean signals over the full text, each contributing 20 points and
//! exactly one strength or improvement line. Pure and side-effect-free; the
//! LLM-backed scorer in [`llm`] emits the identical shape and falls back to
//! this one on any failure.

pub mod llm;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::models::context::ScoreResult;

static PROJECTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(projects?|built|developed)\b").unwrap());
static INTERNSHIPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)intern").unwrap());
static LEADERSHIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(led|leaders?|leadership|captain|president)\b").unwrap());
static IMPACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(increased|reduced|improved|optimized|achieved|percent)\b|%").unwrap()
});
static SKILLS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(python|java|javascript|typescript|golang|rust|react|node|sql|aws|azure|docker|kubernetes|git|html|css)\b|\bc\+\+",
    )
    .unwrap()
});

/// Scores `text` from its five signals. For each signal exactly one line is
/// appended, to strengths when present and to improvements when absent, in
/// the fixed order: projects, internships, impact, leadership, skills.
pub fn heuristic_score(text: &str) -> ScoreResult {
    let checks: [(&str, bool, &str, &str); 5] = [
        (
            "projects",
            PROJECTS.is_match(text),
            "Demonstrates hands-on project experience.",
            "Add personal or academic projects to show applied skills.",
        ),
        (
            "internships",
            INTERNSHIPS.is_match(text),
            "Internship experience signals workplace readiness.",
            "Pursue an internship or co-op to add professional experience.",
        ),
        (
            "impact",
            IMPACT.is_match(text),
            "Quantifies impact with measurable results.",
            "Quantify achievements with numbers or percentages (e.g. 'reduced load time by 30%').",
        ),
        (
            "leadership",
            LEADERSHIP.is_match(text),
            "Shows leadership or ownership of initiatives.",
            "Highlight leadership roles such as clubs, teams, or project ownership.",
        ),
        (
            "skills",
            SKILLS.is_match(text),
            "Lists recognizable technical skills.",
            "Add a skills section naming specific languages, frameworks, and tools.",
        ),
    ];

    let mut signals = BTreeMap::new();
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();

    for (name, hit, strength, improvement) in checks {
        signals.insert(name.to_string(), hit);
        if hit {
            strengths.push(strength.to_string());
        } else {
            improvements.push(improvement.to_string());
        }
    }

    let hits = signals.values().filter(|hit| **hit).count();
    let score = (100.0 * hits as f64 / 5.0).round() as u32;

    ScoreResult {
        score,
        signals,
        strengths,
        improvements,
    }
}
