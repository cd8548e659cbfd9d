//! Flat-file context store.
//!
//! Layout under the data root:
//!   uploads/<ts>_<sanitized-name>     raw uploaded bytes
//!   extracted/<ts>_<sanitized-name>.txt  extracted text artifact
//!   <ts>_<sanitized-name>.json        context record
//!
//! Keys are unique per upload (millisecond timestamp plus sanitized original
//! name), records are immutable after creation, and reads tolerate missing or
//! malformed files by reporting absence. No update, no delete, no locking.

use anyhow::{Context as _, Result};
use bytes::Bytes;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::models::context::ContextRecord;

#[derive(Debug, Clone)]
pub struct ContextStore {
    root: PathBuf,
    uploads: PathBuf,
    extracted: PathBuf,
}

impl ContextStore {
    /// Opens the store rooted at `data_dir`, creating the directory tree if
    /// needed.
    pub async fn open(data_dir: &Path) -> Result<Self> {
        let store = Self {
            root: data_dir.to_path_buf(),
            uploads: data_dir.join("uploads"),
            extracted: data_dir.join("extracted"),
        };
        fs::create_dir_all(&store.uploads)
            .await
            .with_context(|| format!("failed to create {}", store.uploads.display()))?;
        fs::create_dir_all(&store.extracted)
            .await
            .with_context(|| format!("failed to create {}", store.extracted.display()))?;
        Ok(store)
    }

    /// Generates the stored file name (and thus the context id) for an
    /// upload: millisecond timestamp plus the sanitized original name.
    pub fn allocate_name(original: &str) -> String {
        format!(
            "{}_{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original)
        )
    }

    /// Persists the raw upload bytes and returns the stored path.
    pub async fn save_upload(&self, stored_name: &str, data: Bytes) -> Result<PathBuf> {
        let path = self.uploads.join(stored_name);
        fs::write(&path, &data)
            .await
            .with_context(|| format!("failed to write upload {}", path.display()))?;
        Ok(path)
    }

    /// Writes the extracted-text artifact, then the context record. The
    /// record's `extracted_file` therefore references an artifact that exists
    /// at write time. Returns the context id.
    pub async fn write(&self, record: &ContextRecord, extracted_text: &str) -> Result<String> {
        let text_path = self.extracted.join(&record.extracted_file);
        fs::write(&text_path, extracted_text)
            .await
            .with_context(|| format!("failed to write {}", text_path.display()))?;

        let json_path = self.record_path(&record.context_id);
        let body =
            serde_json::to_vec_pretty(record).context("failed to serialize context record")?;
        fs::write(&json_path, body)
            .await
            .with_context(|| format!("failed to write {}", json_path.display()))?;

        Ok(record.context_id.clone())
    }

    /// Loads a context record. A missing or malformed record reads as absent,
    /// never as an error.
    pub async fn read(&self, context_id: &str) -> Option<ContextRecord> {
        if !is_safe_name(context_id) {
            warn!("rejected unsafe context id {context_id:?}");
            return None;
        }
        let path = self.record_path(context_id);
        let raw = fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("malformed context record {}: {e}", path.display());
                None
            }
        }
    }

    /// Loads the extracted-text artifact referenced by a record. The artifact
    /// may have been deleted externally; absence is reported as `None`.
    pub async fn read_extracted_text(&self, record: &ContextRecord) -> Option<String> {
        if !is_safe_name(&record.extracted_file) {
            warn!(
                "rejected unsafe extracted-file reference {:?}",
                record.extracted_file
            );
            return None;
        }
        fs::read_to_string(self.extracted.join(&record.extracted_file))
            .await
            .ok()
    }

    fn record_path(&self, context_id: &str) -> PathBuf {
        self.root.join(format!("{context_id}.json"))
    }
}

/// Reduces a client-supplied file name to a safe single path component:
/// strips any directory part, replaces everything outside
/// `[A-Za-z0-9._-]` with `_`, and trims leading/trailing dots.
pub fn sanitize_file_name(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A name is safe when it cannot escape its directory.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}
