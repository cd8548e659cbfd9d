use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Controls the PDF OCR fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    /// OCR only when direct text extraction comes up short.
    Auto,
    /// Always OCR; the OCR text wins whenever it is non-empty.
    Force,
    /// Never OCR; direct extraction is the only PDF strategy.
    Off,
}

impl OcrMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(OcrMode::Auto),
            "force" => Ok(OcrMode::Force),
            "off" | "disable" | "disabled" => Ok(OcrMode::Off),
            other => bail!("OCR_MODE must be 'auto', 'force', or 'off' (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; a missing API key degrades to
/// dev-mode fallbacks instead of erroring.
#[derive(Debug, Clone)]
pub struct Config {
    /// Generation API credential. `None` means placeholder chat replies and
    /// heuristic-only scoring.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    /// Root of the flat-file store (uploads, extracted text, context records).
    pub data_dir: PathBuf,
    pub ocr_mode: OcrMode,
    /// Direct PDF text shorter than this many characters triggers the OCR
    /// fallback when `ocr_mode` is `Auto`.
    pub pdf_text_threshold: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            data_dir: PathBuf::from(
                std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
            ocr_mode: match optional_env("OCR_MODE") {
                Some(raw) => OcrMode::parse(&raw)?,
                None => OcrMode::Auto,
            },
            pdf_text_threshold: std::env::var("PDF_TEXT_THRESHOLD")
                .unwrap_or_else(|_| "200".to_string())
                .parse::<usize>()
                .context("PDF_TEXT_THRESHOLD must be a non-negative integer")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an optional environment variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
