//! Section-level resume analysis layered on a score result.
//!
//! Everything here is pure and deterministic: section presence regexes with
//! fixed sub-score constants, a keyword density map, a quantified-achievement
//! detector, an ATS estimate, and three extra strength/improvement checks
//! appended to the lists inherited from the scorer.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::models::context::{AnalysisReport, ScoreResult};

/// Section name, presence pattern, sub-score when present, sub-score when
/// absent. The constants are fixed by design; they are never recomputed.
const SECTIONS: &[(&str, &str, u32, u32)] = &[
    ("contact_info", r"(?i)@|\bemail\b|\bphone\b|linkedin", 9, 4),
    ("summary", r"(?i)\b(summary|objective|profile)\b", 7, 3),
    (
        "experience",
        r"(?i)\b(experience|employment|work history)\b",
        8,
        3,
    ),
    (
        "education",
        r"(?i)\b(education|university|college|bachelor|master|degree)\b",
        8,
        4,
    ),
    (
        "skills",
        r"(?i)\b(skills?|technologies|proficiencies)\b",
        8,
        3,
    ),
    ("projects", r"(?i)\bprojects?\b", 8, 4),
    (
        "certifications",
        r"(?i)\b(certifications?|certified|certificate)\b",
        6,
        3,
    ),
];

static SECTION_PATTERNS: Lazy<Vec<(&'static str, Regex, u32, u32)>> = Lazy::new(|| {
    SECTIONS
        .iter()
        .map(|(name, pattern, present, absent)| {
            (*name, Regex::new(pattern).unwrap(), *present, *absent)
        })
        .collect()
});

/// Fixed technical keyword vocabulary for the density map, word-boundary
/// matched case-insensitively.
const TECH_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "node",
    "sql",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "git",
    "linux",
    "rust",
    "go",
    "c++",
    "api",
    "machine learning",
];

static KEYWORD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TECH_KEYWORDS
        .iter()
        .map(|keyword| {
            // "c++" cannot take a trailing \b (no word char after '+')
            let pattern = if *keyword == "c++" {
                r"(?i)\bc\+\+".to_string()
            } else {
                format!(r"(?i)\b{}\b", regex::escape(keyword))
            };
            (*keyword, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Percentages, or numbers paired with a recognized unit of magnitude.
static QUANTIFIED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+(\.\d+)?\s*%|\d+(\.\d+)?\s*(percent|users|ms|sec|seconds|minutes|hours|x|times|issues|tickets|revenue|sales)\b",
    )
    .unwrap()
});

/// Builds the full analysis report from the text and the score result whose
/// strengths/improvements it extends.
pub fn analyze(text: &str, score: &ScoreResult) -> AnalysisReport {
    let presence: Vec<(&str, bool, u32, u32)> = SECTION_PATTERNS
        .iter()
        .map(|(name, re, present, absent)| (*name, re.is_match(text), *present, *absent))
        .collect();

    let sections: BTreeMap<String, u32> = presence
        .iter()
        .map(|(name, found, present, absent)| {
            (name.to_string(), if *found { *present } else { *absent })
        })
        .collect();

    let keyword_density: BTreeMap<String, usize> = KEYWORD_PATTERNS
        .iter()
        .filter_map(|(keyword, re)| {
            let count = re.find_iter(text).count();
            (count > 0).then(|| (keyword.to_string(), count))
        })
        .collect();

    let quantified = QUANTIFIED.is_match(text);
    let section_present =
        |name: &str| presence.iter().any(|(n, found, _, _)| *n == name && *found);

    let mut strengths = score.strengths.clone();
    let mut improvements = score.improvements.clone();

    if quantified {
        strengths.push("Achievements are backed by concrete numbers.".to_string());
    } else {
        improvements.push(
            "Add measurable outcomes (users served, time saved, revenue) to your bullet points."
                .to_string(),
        );
    }
    if section_present("projects") {
        strengths.push("A dedicated projects section is present.".to_string());
    } else {
        improvements.push(
            "Create a dedicated 'Projects' section so reviewers can find your work quickly."
                .to_string(),
        );
    }
    if section_present("skills") {
        strengths.push("A dedicated skills section makes keyword scanning easy.".to_string());
    } else {
        improvements
            .push("Add a dedicated 'Skills' section; ATS filters look for one.".to_string());
    }

    let ats_signals = [
        section_present("skills"),
        section_present("experience"),
        section_present("education"),
        !keyword_density.is_empty(),
        quantified,
    ];
    let ats_hits = ats_signals.iter().filter(|hit| **hit).count();
    let ats_score = (100.0 * ats_hits as f64 / ats_signals.len() as f64).round() as u32;

    // Mean section sub-score normalized to the 0-10 scale.
    let section_sum: u32 = sections.values().sum();
    let overall_score =
        (10.0 * section_sum as f64 / (SECTIONS.len() as f64 * 10.0)).round() as u32;

    AnalysisReport {
        overall_score,
        sections,
        ats_score,
        keyword_density,
        strengths,
        improvements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::heuristic_score;

    const FULL_RESUME: &str = "\
        Jane Doe - jane@example.com - phone 555-0100\n\n\
        Summary\nBackend engineer focused on reliability.\n\n\
        Experience\nReduced deploy time by 40% and served 10000 users. \
        Led a platform team during a summer internship.\n\n\
        Education\nBachelor of Science, State University.\n\n\
        Skills\nPython, Python, Rust, Docker, SQL.\n\n\
        Projects\nBuilt and developed an open source scheduler.\n\n\
        Certifications\nAWS Certified Developer.";

    fn analyze_with_heuristic(text: &str) -> AnalysisReport {
        analyze(text, &heuristic_score(text))
    }

    #[test]
    fn test_scores_stay_in_bounds_for_empty_input() {
        let report = analyze_with_heuristic("");
        assert!(report.overall_score <= 10);
        assert!(report.ats_score <= 100);
        assert!(report.keyword_density.is_empty());
    }

    #[test]
    fn test_scores_stay_in_bounds_for_arbitrary_input() {
        for text in ["%%%%%", "1234567890", "a", FULL_RESUME] {
            let report = analyze_with_heuristic(text);
            assert!(report.overall_score <= 10, "overall out of range for {text:?}");
            assert!(report.ats_score <= 100, "ats out of range for {text:?}");
        }
    }

    #[test]
    fn test_full_resume_detects_every_section() {
        let report = analyze_with_heuristic(FULL_RESUME);
        assert_eq!(report.sections.len(), 7);
        assert_eq!(report.sections["contact_info"], 9);
        assert_eq!(report.sections["experience"], 8);
        assert_eq!(report.sections["certifications"], 6);
    }

    #[test]
    fn test_empty_text_gets_absent_sub_scores() {
        let report = analyze_with_heuristic("");
        assert_eq!(report.sections["contact_info"], 4);
        assert_eq!(report.sections["experience"], 3);
    }

    #[test]
    fn test_full_resume_ats_score_is_one_hundred() {
        let report = analyze_with_heuristic(FULL_RESUME);
        assert_eq!(report.ats_score, 100);
    }

    #[test]
    fn test_empty_text_ats_score_is_zero() {
        assert_eq!(analyze_with_heuristic("").ats_score, 0);
    }

    #[test]
    fn test_keyword_density_counts_occurrences() {
        let report = analyze_with_heuristic(FULL_RESUME);
        assert_eq!(report.keyword_density["python"], 2);
        assert_eq!(report.keyword_density["rust"], 1);
        assert!(!report.keyword_density.contains_key("kubernetes"));
    }

    #[test]
    fn test_keyword_matching_respects_word_boundaries() {
        let report = analyze_with_heuristic("I write javascript daily");
        assert_eq!(report.keyword_density["javascript"], 1);
        // "javascript" must not also count as "java"
        assert!(!report.keyword_density.contains_key("java"));
    }

    #[test]
    fn test_quantification_detector() {
        for quantified in [
            "improved throughput by 35%",
            "handled 2000 users",
            "cut latency to 20 ms",
            "delivered a 3x speedup",
            "closed 45 tickets",
        ] {
            let report = analyze_with_heuristic(quantified);
            assert!(
                report.strengths.iter().any(|s| s.contains("concrete numbers")),
                "expected quantification for {quantified:?}"
            );
        }
        let report = analyze_with_heuristic("made things considerably faster");
        assert!(report
            .improvements
            .iter()
            .any(|s| s.contains("measurable outcomes")));
    }

    #[test]
    fn test_extends_inherited_lists_by_exactly_three() {
        let score = heuristic_score(FULL_RESUME);
        let report = analyze(FULL_RESUME, &score);
        let inherited = score.strengths.len() + score.improvements.len();
        let extended = report.strengths.len() + report.improvements.len();
        assert_eq!(extended, inherited + 3);
        // inherited lines come first, in their original order
        assert_eq!(report.strengths[..score.strengths.len()], score.strengths[..]);
    }

    #[test]
    fn test_overall_score_for_full_resume() {
        // 9 + 7 + 8 + 8 + 8 + 8 + 6 = 54 -> round(540 / 70) = 8
        let report = analyze_with_heuristic(FULL_RESUME);
        assert_eq!(report.overall_score, 8);
    }

    #[test]
    fn test_overall_score_for_empty_text() {
        // 4 + 3 + 3 + 4 + 3 + 4 + 3 = 24 -> round(240 / 70) = 3
        let report = analyze_with_heuristic("");
        assert_eq!(report.overall_score, 3);
    }
}
