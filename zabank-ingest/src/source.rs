//! The extraction boundary: one capability trait, two concrete backends.
//!
//! A `DocumentSource` turns a PDF's bytes into `(full text, detected
//! tables)`. `PdfTextSource` handles selectable-text PDFs, `OcrSource`
//! handles scans, and `Auto` chains them. Everything past this trait is
//! pure parsing with no process spawning.

use anyhow::Result;
use std::str::FromStr;
use tracing::debug;
use zabank_core::{ExtractedDocument, RawDocument};

use crate::ocr::{OcrOptions, OcrSource};
use crate::pdftext::PdfTextSource;

pub trait DocumentSource {
    fn name(&self) -> &'static str;
    fn extract(&self, doc: &RawDocument) -> Result<ExtractedDocument>;
}

/// Which backend handles a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Layout text first, OCR when the text comes back empty.
    #[default]
    Auto,
    Text,
    Ocr,
}

impl FromStr for ExtractionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "text" => Ok(Self::Text),
            "ocr" => Ok(Self::Ocr),
            other => anyhow::bail!("unknown extraction mode: {other} (auto|text|ocr)"),
        }
    }
}

/// Layout text first; OCR when the text backend fails or recovers nothing.
/// Scanned PDFs routinely yield zero text from `pdftotext`, so an empty
/// result is a routing signal, not a failure.
struct AutoSource {
    text: PdfTextSource,
    ocr: OcrSource,
}

impl DocumentSource for AutoSource {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn extract(&self, doc: &RawDocument) -> Result<ExtractedDocument> {
        match self.text.extract(doc) {
            Ok(extracted) if !extracted.is_empty() => Ok(extracted),
            Ok(_) => {
                debug!(document = %doc.name, "layout text empty, falling back to OCR");
                self.ocr.extract(doc)
            }
            Err(err) => {
                debug!(document = %doc.name, error = %err, "text backend failed, falling back to OCR");
                self.ocr.extract(doc)
            }
        }
    }
}

/// Build the backend for a mode. OCR options only matter when the OCR
/// backend can run.
pub fn source_for_mode(mode: ExtractionMode, ocr: OcrOptions) -> Box<dyn DocumentSource> {
    match mode {
        ExtractionMode::Auto => Box::new(AutoSource {
            text: PdfTextSource,
            ocr: OcrSource::new(ocr),
        }),
        ExtractionMode::Text => Box::new(PdfTextSource),
        ExtractionMode::Ocr => Box::new(OcrSource::new(ocr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("auto".parse::<ExtractionMode>().unwrap(), ExtractionMode::Auto);
        assert_eq!("OCR".parse::<ExtractionMode>().unwrap(), ExtractionMode::Ocr);
        assert!("pdfium".parse::<ExtractionMode>().is_err());
    }
}
