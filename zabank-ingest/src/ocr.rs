//! OCR backend for scanned PDFs: `pdftoppm` to rasterize, `tesseract` to
//! recognize. Both tools come from the system (poppler-utils and
//! tesseract-ocr); missing tools fail the affected document, not the
//! process. This backend never produces tables, so downstream parsing
//! always runs in unstructured mode.

use anyhow::{bail, Context, Result};
use std::fs;
use std::process::Command;
use tracing::debug;
use zabank_core::{ExtractedDocument, RawDocument};

use crate::source::DocumentSource;

/// Knobs for the OCR toolchain.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Render resolution; higher is slower but reads small print better.
    pub dpi: u32,
    /// Tesseract language code.
    pub lang: String,
    /// Tesseract page segmentation mode. 6 assumes one uniform block of
    /// text, which suits statement pages.
    pub psm: u32,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            lang: "eng".to_string(),
            psm: 6,
        }
    }
}

pub struct OcrSource {
    options: OcrOptions,
}

impl OcrSource {
    pub fn new(options: OcrOptions) -> Self {
        Self { options }
    }
}

impl DocumentSource for OcrSource {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn extract(&self, doc: &RawDocument) -> Result<ExtractedDocument> {
        which::which("pdftoppm")
            .map_err(|_| anyhow::anyhow!("pdftoppm not installed (poppler-utils)"))?;
        which::which("tesseract")
            .map_err(|_| anyhow::anyhow!("tesseract not installed (tesseract-ocr)"))?;

        let temp_dir = tempfile::tempdir().context("creating OCR temp dir")?;
        let pdf_path = temp_dir.path().join("input.pdf");
        fs::write(&pdf_path, &doc.bytes)
            .with_context(|| format!("writing temp copy of {}", doc.name))?;

        let prefix = temp_dir.path().join("page");
        let rasterize = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.options.dpi.to_string())
            .arg(&pdf_path)
            .arg(&prefix)
            .output()
            .context("running pdftoppm")?;
        if !rasterize.status.success() {
            let stderr = String::from_utf8_lossy(&rasterize.stderr);
            bail!("pdftoppm failed for {}: {}", doc.name, stderr.trim());
        }

        let mut pages: Vec<_> = fs::read_dir(temp_dir.path())
            .context("listing rendered pages")?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        pages.sort();

        if pages.is_empty() {
            bail!("pdftoppm produced no pages for {}", doc.name);
        }
        debug!(document = %doc.name, pages = pages.len(), dpi = self.options.dpi, "running OCR");

        let mut text = String::new();
        for page in &pages {
            let recognized = Command::new("tesseract")
                .arg(page)
                .arg("stdout")
                .arg("-l")
                .arg(&self.options.lang)
                .arg("--psm")
                .arg(self.options.psm.to_string())
                .output()
                .context("running tesseract")?;
            if !recognized.status.success() {
                let stderr = String::from_utf8_lossy(&recognized.stderr);
                bail!("tesseract failed for {}: {}", doc.name, stderr.trim());
            }
            text.push_str(&String::from_utf8_lossy(&recognized.stdout));
            text.push_str("\n\n");
        }

        Ok(ExtractedDocument {
            text,
            tables: Vec::new(),
        })
    }
}
