//! Data model shared by the extraction backends and the pipeline.

use chrono::NaiveDate;
use serde::Serialize;

/// One uploaded PDF: raw bytes plus the display name the operator sees in
/// status output. Owned by the batch for the duration of one run.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Output of a `DocumentSource`: the full concatenated page text plus every
/// detected table in page order. OCR backends never produce tables.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub text: String,
    pub tables: Vec<Table>,
}

impl ExtractedDocument {
    /// True when the backend recovered nothing usable from the document.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tables.is_empty()
    }
}

/// A detected table: header cells plus body rows of cell strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// How a row's monetary value arrived from the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountCells {
    /// Separate debit/credit columns (structured statements).
    Split {
        debits: Option<String>,
        credits: Option<String>,
    },
    /// One signed amount column; the sign rides on a Dr/Cr marker or a
    /// leading minus.
    Single(String),
    /// Unsigned printed amount; polarity comes from the description
    /// keyword heuristic.
    Inferred(String),
}

/// One candidate transaction before normalization. Transient: produced by
/// the table locator, consumed by the pipeline, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub date_fragment: String,
    pub description: String,
    pub cells: AmountCells,
    pub balance_fragment: Option<String>,
}

/// Normalized output record.
///
/// Invariants enforced by the pipeline: `date` is a valid calendar date,
/// `description` is non-empty after sanitization, `amount` is non-zero and
/// rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
}
