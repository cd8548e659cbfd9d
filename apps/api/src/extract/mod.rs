//! Best-effort text extraction for uploaded resumes.
//!
//! `extract` never fails: every strategy (direct PDF text, rasterize-and-OCR,
//! vision OCR, plain UTF-8 read) is individually isolated, and a failing
//! stage contributes an empty string while the cascade continues with
//! whatever text it already has.

pub mod engines;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use crate::config::{Config, OcrMode};
use crate::extract::engines::{OcrEngine, PageRasterizer};
use crate::llm_client::LlmClient;

/// Fixed instruction for the vision OCR fallback.
const VISION_OCR_INSTRUCTION: &str =
    "Extract all clearly readable text from this image. Return the text only, no commentary.";

/// Image OCR results shorter than this trigger the vision fallback when a
/// generation API credential is configured.
const IMAGE_OCR_QUALITY_THRESHOLD: usize = 100;

/// Ordered extraction cascade over pluggable engines.
#[derive(Clone)]
pub struct TextExtractor {
    rasterizer: Arc<dyn PageRasterizer>,
    ocr: Arc<dyn OcrEngine>,
    llm: LlmClient,
    ocr_mode: OcrMode,
    pdf_text_threshold: usize,
}

impl TextExtractor {
    pub fn new(
        rasterizer: Arc<dyn PageRasterizer>,
        ocr: Arc<dyn OcrEngine>,
        llm: LlmClient,
        config: &Config,
    ) -> Self {
        Self {
            rasterizer,
            ocr,
            llm,
            ocr_mode: config.ocr_mode,
            pdf_text_threshold: config.pdf_text_threshold,
        }
    }

    /// Extracts the best text it can from `path`, dispatching on the declared
    /// extension (lowercase, no dot). Returns an empty string when every
    /// strategy comes up dry.
    pub async fn extract(&self, path: &Path, extension: &str) -> String {
        let text = match extension {
            "pdf" => self.extract_pdf(path).await,
            "png" | "jpg" | "jpeg" | "webp" => self.extract_image(path, extension).await,
            _ => read_plain_text(path).await,
        };
        normalize(&text)
    }

    async fn extract_pdf(&self, path: &Path) -> String {
        let direct = direct_pdf_text(path).await;
        if self.ocr_mode == OcrMode::Off {
            return direct;
        }
        if self.ocr_mode == OcrMode::Auto
            && direct.chars().count() >= self.pdf_text_threshold
        {
            return direct;
        }

        let ocr_text = self.ocr_pdf_pages(path).await;
        choose_pdf_text(direct, ocr_text, self.ocr_mode == OcrMode::Force)
    }

    /// Rasterizes the PDF into a request-private scratch directory and OCRs
    /// each page in order. The scratch directory is removed on every exit
    /// path (TempDir drop; removal failure is swallowed).
    async fn ocr_pdf_pages(&self, path: &Path) -> String {
        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!("failed to create OCR scratch directory: {e}");
                return String::new();
            }
        };

        let pages = match self.rasterizer.rasterize(path, scratch.path()).await {
            Ok(pages) => pages,
            Err(e) => {
                warn!("PDF rasterization failed: {e:#}");
                Vec::new()
            }
        };

        let mut parts = Vec::new();
        for page in &pages {
            match self.ocr.recognize(page).await {
                Ok(text) => parts.push(text),
                Err(e) => warn!("OCR failed for {}: {e:#}", page.display()),
            }
        }

        parts.join("\n")
    }

    async fn extract_image(&self, path: &Path, extension: &str) -> String {
        let ocr_text = match self.ocr.recognize(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("image OCR failed for {}: {e:#}", path.display());
                String::new()
            }
        };

        if ocr_text.chars().count() >= IMAGE_OCR_QUALITY_THRESHOLD || !self.llm.is_configured() {
            return ocr_text;
        }

        // OCR came up short; ask the vision model and keep the longer result.
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("failed to re-read image for vision OCR: {e}");
                return ocr_text;
            }
        };
        match self
            .llm
            .call_vision(&bytes, media_type_for(extension), VISION_OCR_INSTRUCTION)
            .await
        {
            Ok(vision) if vision.chars().count() > ocr_text.chars().count() => vision,
            Ok(_) => ocr_text,
            Err(e) => {
                warn!("vision OCR failed: {e}");
                ocr_text
            }
        }
    }
}

/// Picks the final PDF text. Forced OCR wins whenever it produced anything;
/// otherwise the longer of the two texts wins.
fn choose_pdf_text(direct: String, ocr: String, forced: bool) -> String {
    if forced && !ocr.trim().is_empty() {
        return ocr;
    }
    if ocr.chars().count() > direct.chars().count() {
        ocr
    } else {
        direct
    }
}

async fn direct_pdf_text(path: &Path) -> String {
    let path = path.to_path_buf();
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("direct PDF text extraction failed: {e}");
            String::new()
        }
        Err(e) => {
            warn!("PDF extraction task panicked: {e}");
            String::new()
        }
    }
}

async fn read_plain_text(path: &Path) -> String {
    match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_default(),
        Err(e) => {
            warn!("failed to read {} as text: {e}", path.display());
            String::new()
        }
    }
}

/// Maps an image extension to the MIME type the vision API expects.
fn media_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalizes extracted text: strips carriage returns, collapses runs of
/// horizontal whitespace to a single space, collapses three or more
/// consecutive newlines to one blank line, trims the ends. Idempotent.
pub fn normalize(text: &str) -> String {
    let text = text.replace('\r', "");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    // ── Stub engines ────────────────────────────────────────────────────────

    /// Records whether it ran and where, then fabricates page images.
    struct RecordingRasterizer {
        called: AtomicBool,
        scratch_dir: Mutex<Option<PathBuf>>,
        pages: usize,
    }

    impl RecordingRasterizer {
        fn new(pages: usize) -> Self {
            Self {
                called: AtomicBool::new(false),
                scratch_dir: Mutex::new(None),
                pages,
            }
        }
    }

    #[async_trait]
    impl PageRasterizer for RecordingRasterizer {
        async fn rasterize(&self, _pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
            self.called.store(true, Ordering::SeqCst);
            *self.scratch_dir.lock().unwrap() = Some(out_dir.to_path_buf());
            let mut out = Vec::new();
            for i in 0..self.pages {
                let page = out_dir.join(format!("page-{i:03}.png"));
                std::fs::write(&page, b"not really a png")?;
                out.push(page);
            }
            Ok(out)
        }
    }

    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        async fn recognize(&self, _image_path: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingOcr;

    #[async_trait]
    impl OcrEngine for FailingOcr {
        async fn recognize(&self, _image_path: &Path) -> Result<String> {
            bail!("ocr unavailable")
        }
    }

    fn test_config(ocr_mode: OcrMode) -> Config {
        Config {
            anthropic_api_key: None,
            port: 0,
            data_dir: PathBuf::from("unused"),
            ocr_mode,
            pdf_text_threshold: 200,
            rust_log: "info".to_string(),
        }
    }

    fn extractor(
        rasterizer: Arc<RecordingRasterizer>,
        ocr: Arc<dyn OcrEngine>,
        mode: OcrMode,
    ) -> TextExtractor {
        TextExtractor::new(rasterizer, ocr, LlmClient::new(None), &test_config(mode))
    }

    // ── PDF fixture ─────────────────────────────────────────────────────────

    /// Minimal valid single-page PDF containing `phrase` as its only text.
    /// Builds the body first, then the xref with correct byte offsets so
    /// pdf-extract can parse it. `phrase` must not contain `(`, `)` or `\`.
    fn minimal_pdf(phrase: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 50 700 Td ({phrase}) Tj ET\n");
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        let o1 = out.len();
        out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
        let o2 = out.len();
        out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
        let o3 = out.len();
        out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
        let o4 = out.len();
        out.extend_from_slice(
            format!("4 0 obj << /Length {} >> stream\n", content.len()).as_bytes(),
        );
        out.extend_from_slice(content.as_bytes());
        out.extend_from_slice(b"endstream endobj\n");
        let o5 = out.len();
        out.extend_from_slice(
            b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
        );
        let xref_start = out.len();
        out.extend_from_slice(b"xref\n0 6\n");
        out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
        for offset in [o1, o2, o3, o4, o5] {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
        out.extend_from_slice(format!("{xref_start}\n").as_bytes());
        out.extend_from_slice(b"%%EOF\n");
        out
    }

    /// A phrase comfortably past the 200-char OCR threshold.
    fn rich_phrase() -> String {
        "Senior software engineer with eight years of experience building and operating \
         distributed backend services. Designed ingestion pipelines processing millions \
         of documents per day and mentored a team of five engineers across two offices."
            .to_string()
    }

    // ── Normalization ───────────────────────────────────────────────────────

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = "A  resume\r\nwith\t\ttabs\n\n\n\nand   runs   of spaces\n\n\n";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_strips_carriage_returns() {
        assert_eq!(normalize("a\r\nb\r\n"), "a\nb");
    }

    #[test]
    fn test_normalize_collapses_horizontal_whitespace() {
        assert_eq!(normalize("a \t  b"), "a b");
    }

    #[test]
    fn test_normalize_collapses_newline_runs_to_one_blank_line() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
        // two newlines (one blank line) stay untouched
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
    }

    // ── Final-text choice ───────────────────────────────────────────────────

    #[test]
    fn test_choose_pdf_text_longer_wins() {
        assert_eq!(
            choose_pdf_text("short".into(), "much longer text".into(), false),
            "much longer text"
        );
        assert_eq!(
            choose_pdf_text("much longer text".into(), "short".into(), false),
            "much longer text"
        );
    }

    #[test]
    fn test_choose_pdf_text_forced_ocr_wins_when_nonempty() {
        assert_eq!(
            choose_pdf_text("a very long direct extraction".into(), "ocr".into(), true),
            "ocr"
        );
    }

    #[test]
    fn test_choose_pdf_text_forced_but_empty_falls_back() {
        assert_eq!(
            choose_pdf_text("direct".into(), "   ".into(), true),
            "direct"
        );
    }

    // ── PDF cascade ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_pdf_with_rich_text_skips_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("resume.pdf");
        std::fs::write(&pdf, minimal_pdf(&rich_phrase())).unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(2));
        let ex = extractor(rasterizer.clone(), Arc::new(FailingOcr), OcrMode::Auto);

        let text = ex.extract(&pdf, "pdf").await;
        assert!(text.contains("Senior software engineer"), "got: {text}");
        assert!(
            !rasterizer.called.load(Ordering::SeqCst),
            "rasterizer must not run when direct extraction is long enough"
        );
    }

    #[tokio::test]
    async fn test_pdf_with_scant_text_falls_back_to_ocr_and_cleans_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("scan.pdf");
        std::fs::write(&pdf, minimal_pdf("stub")).unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(2));
        let ex = extractor(
            rasterizer.clone(),
            Arc::new(FixedOcr("ALPHA BETA")),
            OcrMode::Auto,
        );

        let text = ex.extract(&pdf, "pdf").await;
        assert_eq!(text.matches("ALPHA BETA").count(), 2, "got: {text}");

        let scratch = rasterizer.scratch_dir.lock().unwrap().clone().unwrap();
        assert!(
            !scratch.exists(),
            "scratch directory must be removed after extraction"
        );
    }

    #[tokio::test]
    async fn test_pdf_direct_failure_degrades_to_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("broken.pdf");
        std::fs::write(&pdf, b"this is not a pdf at all").unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(1));
        let ex = extractor(
            rasterizer.clone(),
            Arc::new(FixedOcr("ALPHA BETA")),
            OcrMode::Auto,
        );

        assert_eq!(ex.extract(&pdf, "pdf").await, "ALPHA BETA");
    }

    #[tokio::test]
    async fn test_pdf_ocr_disabled_never_rasterizes() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("scan.pdf");
        std::fs::write(&pdf, minimal_pdf("stub")).unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(2));
        let ex = extractor(
            rasterizer.clone(),
            Arc::new(FixedOcr("ALPHA BETA")),
            OcrMode::Off,
        );

        let text = ex.extract(&pdf, "pdf").await;
        assert!(text.contains("stub"), "got: {text}");
        assert!(!rasterizer.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_pdf_forced_ocr_wins_over_longer_direct_text() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("resume.pdf");
        std::fs::write(&pdf, minimal_pdf(&rich_phrase())).unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(1));
        let ex = extractor(
            rasterizer.clone(),
            Arc::new(FixedOcr("OCR OUTPUT")),
            OcrMode::Force,
        );

        assert_eq!(ex.extract(&pdf, "pdf").await, "OCR OUTPUT");
    }

    // ── Images and plain text ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_image_uses_ocr_directly() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("photo.png");
        std::fs::write(&img, b"fake png").unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(0));
        let ex = extractor(rasterizer, Arc::new(FixedOcr("text from an image")), OcrMode::Auto);

        assert_eq!(ex.extract(&img, "png").await, "text from an image");
    }

    #[tokio::test]
    async fn test_image_ocr_failure_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("photo.jpg");
        std::fs::write(&img, b"fake jpg").unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(0));
        let ex = extractor(rasterizer, Arc::new(FailingOcr), OcrMode::Auto);

        assert_eq!(ex.extract(&img, "jpg").await, "");
    }

    #[tokio::test]
    async fn test_unknown_extension_reads_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("resume.txt");
        std::fs::write(&txt, "plain text resume").unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(0));
        let ex = extractor(rasterizer, Arc::new(FailingOcr), OcrMode::Auto);

        assert_eq!(ex.extract(&txt, "txt").await, "plain text resume");
    }

    #[tokio::test]
    async fn test_unknown_extension_invalid_utf8_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("resume.bin");
        std::fs::write(&bin, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let rasterizer = Arc::new(RecordingRasterizer::new(0));
        let ex = extractor(rasterizer, Arc::new(FailingOcr), OcrMode::Auto);

        assert_eq!(ex.extract(&bin, "bin").await, "");
    }
}
