//! Per-document failure taxonomy.
//!
//! All of these are non-fatal to the batch: a failing document is reported
//! and skipped, and the remaining documents still contribute output.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("no text or tables extracted")]
    ExtractionEmpty,

    #[error("no transaction table found")]
    TableNotFound,

    #[error("statement year not found")]
    YearNotFound,

    #[error("no transactions survived parsing")]
    NoTransactions,

    #[error("extraction failed: {0}")]
    Extraction(String),
}
