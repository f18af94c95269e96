//! zabank-ingest: extraction backends, table location and the batch pipeline.

pub mod export;
pub mod locate;
pub mod ocr;
pub mod pdftext;
pub mod pipeline;
pub mod source;

pub use export::{csv_string, write_csv};
pub use locate::locate_rows;
pub use ocr::{OcrOptions, OcrSource};
pub use pipeline::{Batch, BatchOutcome, DocumentReport};
pub use source::{source_for_mode, DocumentSource, ExtractionMode};
