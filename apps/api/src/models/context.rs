use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Readiness score for a resume, produced by the heuristic scorer or by the
/// LLM scorer (both emit the same shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0-100.
    pub score: u32,
    /// Named boolean indicators (projects, internships, leadership, impact, skills).
    pub signals: BTreeMap<String, bool>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Section-level analysis layered on top of a [`ScoreResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Mean section sub-score on a 0-10 scale.
    pub overall_score: u32,
    /// Section name to fixed sub-score (0-10).
    pub sections: BTreeMap<String, u32>,
    /// 0-100 estimate of surviving automated keyword screening.
    pub ats_score: u32,
    /// Technical keyword to occurrence count; only matched keywords appear.
    pub keyword_density: BTreeMap<String, usize>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Per-upload context record, persisted as a single JSON file keyed by
/// `context_id` and read-only after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRecord {
    /// Equals the stored upload's file name (`<unix-millis>_<sanitized-name>`).
    pub context_id: String,
    /// File name of the extracted-text artifact under the extracted dir.
    /// Exists at write time; callers must tolerate later external deletion.
    pub extracted_file: String,
    pub extracted_text_length: usize,
    pub score: ScoreResult,
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}
