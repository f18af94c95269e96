//! zabank-core: pure transformation logic for the SA bank statement converter.
//!
//! Everything here is deterministic string/number/date work with no I/O:
//! amount normalization, description cleanup, sign resolution, statement-year
//! discovery, date completion, and the shared data model. Extraction and
//! orchestration live in `zabank-ingest`.

pub mod amount;
pub mod dates;
pub mod description;
pub mod error;
pub mod rules;
pub mod sign;
pub mod types;

pub use amount::parse_amount;
pub use dates::{complete_date, StatementYear};
pub use description::sanitize_description;
pub use error::DocumentError;
pub use rules::ParseRules;
pub use sign::resolve_amount;
pub use types::{AmountCells, ExtractedDocument, RawDocument, RawRow, Table, Transaction};
