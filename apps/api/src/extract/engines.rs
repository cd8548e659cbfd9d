//! Production extraction engines behind trait seams.
//!
//! Both pdfium and tesseract are blocking, so each implementation hops onto
//! the blocking pool. Tests swap these traits for stubs, which is why the
//! cascade in [`super::TextExtractor`] never names a concrete engine.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Renders PDF pages to images on disk.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Renders every page of `pdf_path` into `out_dir`, returning the image
    /// paths in page order.
    async fn rasterize(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Reads text out of a single image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image_path: &Path) -> Result<String>;
}

/// Rasterizer backed by the system pdfium library.
pub struct PdfiumRasterizer;

/// Target width for rendered pages. Wide enough for tesseract to resolve
/// 10pt body text on a US letter page.
const RENDER_WIDTH_PX: i32 = 1600;

#[async_trait]
impl PageRasterizer for PdfiumRasterizer {
    async fn rasterize(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let pdf_path = pdf_path.to_path_buf();
        let out_dir = out_dir.to_path_buf();
        // pdfium is not async-safe; bind and render entirely on the blocking pool
        tokio::task::spawn_blocking(move || render_pages(&pdf_path, &out_dir))
            .await
            .context("rasterizer task panicked")?
    }
}

fn render_pages(pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    use pdfium_render::prelude::*;

    let bindings = Pdfium::bind_to_system_library().context("pdfium library not available")?;
    let pdfium = Pdfium::new(bindings);
    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .with_context(|| format!("failed to open PDF {}", pdf_path.display()))?;

    let render_config = PdfRenderConfig::new().set_target_width(RENDER_WIDTH_PX);

    let mut pages = Vec::new();
    for (index, page) in document.pages().iter().enumerate() {
        let image = page
            .render_with_config(&render_config)
            .with_context(|| format!("failed to render PDF page {index}"))?
            .as_image();
        let out = out_dir.join(format!("page-{index:03}.png"));
        image
            .save(&out)
            .with_context(|| format!("failed to write {}", out.display()))?;
        pages.push(out);
    }
    Ok(pages)
}

/// OCR engine backed by the tesseract CLI.
pub struct TesseractOcr;

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image_path: &Path) -> Result<String> {
        let image_path = image_path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let image = rusty_tesseract::Image::from_path(&image_path)
                .with_context(|| format!("failed to load image {}", image_path.display()))?;
            let args = rusty_tesseract::Args::default();
            rusty_tesseract::image_to_string(&image, &args).context("tesseract invocation failed")
        })
        .await
        .context("OCR task panicked")?
    }
}
