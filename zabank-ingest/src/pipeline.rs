//! Per-document pipeline and the batch orchestrator.
//!
//! Documents are processed sequentially in upload order; each one either
//! contributes its transactions to the combined result or records a
//! failure reason in its report. One document's failure never stops the
//! batch.

use serde::Serialize;
use tracing::{debug, warn};
use zabank_core::{
    complete_date, resolve_amount, sanitize_description, DocumentError, ParseRules, RawDocument,
    StatementYear, Transaction,
};

use crate::locate::locate_rows;
use crate::source::DocumentSource;

/// Outcome of one document, for operator display and the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub document: String,
    pub transactions: usize,
    pub statement_year: Option<String>,
    pub error: Option<String>,
}

impl DocumentReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Combined result of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub transactions: Vec<Transaction>,
    pub reports: Vec<DocumentReport>,
}

/// One conversion run: the uploaded documents, the parse rules and the
/// extraction backend. Created per invocation and discarded after export;
/// nothing persists across runs.
pub struct Batch {
    documents: Vec<RawDocument>,
    rules: ParseRules,
    source: Box<dyn DocumentSource>,
}

impl Batch {
    pub fn new(rules: ParseRules, source: Box<dyn DocumentSource>) -> Self {
        Self {
            documents: Vec::new(),
            rules,
            source,
        }
    }

    pub fn push(&mut self, document: RawDocument) {
        self.documents.push(document);
    }

    /// Process every document and concatenate the survivors, preserving
    /// upload order across documents and row order within each.
    pub fn run(self) -> BatchOutcome {
        let mut transactions = Vec::new();
        let mut reports = Vec::new();

        for document in &self.documents {
            match process_document(document, self.source.as_ref(), &self.rules) {
                Ok((rows, year)) => {
                    reports.push(DocumentReport {
                        document: document.name.clone(),
                        transactions: rows.len(),
                        statement_year: Some(year.as_str().to_string()),
                        error: None,
                    });
                    transactions.extend(rows);
                }
                Err(err) => {
                    warn!(document = %document.name, error = %err, "document skipped");
                    reports.push(DocumentReport {
                        document: document.name.clone(),
                        transactions: 0,
                        statement_year: None,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        BatchOutcome {
            transactions,
            reports,
        }
    }
}

/// Run one document through extraction, location, normalization and date
/// completion. Row-level failures drop the row; document-level failures
/// return the taxonomy error.
fn process_document(
    document: &RawDocument,
    source: &dyn DocumentSource,
    rules: &ParseRules,
) -> Result<(Vec<Transaction>, StatementYear), DocumentError> {
    let extracted = source
        .extract(document)
        .map_err(|e| DocumentError::Extraction(e.to_string()))?;
    if extracted.is_empty() {
        return Err(DocumentError::ExtractionEmpty);
    }

    let rows = locate_rows(&extracted, rules);
    if rows.is_empty() {
        return Err(DocumentError::TableNotFound);
    }

    let year = StatementYear::find_in_text(&extracted.text).ok_or(DocumentError::YearNotFound)?;

    let mut out = Vec::new();
    for row in rows {
        let Some(amount) = resolve_amount(&row.cells, &row.description, rules) else {
            debug!(description = %row.description, "dropping row: amount unparseable");
            continue;
        };
        let amount = (amount * 100.0).round() / 100.0;
        if amount == 0.0 {
            debug!(description = %row.description, "dropping row: zero amount");
            continue;
        }

        let description = sanitize_description(&row.description);
        if description.is_empty() {
            debug!(raw = %row.description, "dropping row: empty description after cleanup");
            continue;
        }

        let Some(date) = complete_date(&row.date_fragment, &year) else {
            debug!(fragment = %row.date_fragment, "dropping row: date unresolvable");
            continue;
        };

        out.push(Transaction {
            date,
            description,
            amount,
        });
    }

    if out.is_empty() {
        return Err(DocumentError::NoTransactions);
    }
    Ok((out, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use zabank_core::ExtractedDocument;

    /// Source that hands back canned text keyed by document name.
    struct StubSource;

    impl DocumentSource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn extract(&self, doc: &RawDocument) -> Result<ExtractedDocument> {
            match doc.name.as_str() {
                "empty.pdf" => Ok(ExtractedDocument::default()),
                "boom.pdf" => anyhow::bail!("collaborator exploded"),
                _ => Ok(ExtractedDocument {
                    text: String::from_utf8_lossy(&doc.bytes).into_owned(),
                    tables: Vec::new(),
                }),
            }
        }
    }

    const VALID_TEXT: &str = "\
Statement Period: 01 Sep 2025 to 30 Sep 2025
Date Description Amount Balance Accrued
05 Sep Geo Payment From John 500.00 2500.00Cr 0.00
06 Sep Woolworths Sandton 89.99 2410.01Cr 0.00
Closing balance
";

    fn doc(name: &str, text: &str) -> RawDocument {
        RawDocument::new(name, text.as_bytes().to_vec())
    }

    #[test]
    fn test_failures_are_isolated_per_document() {
        let mut batch = Batch::new(ParseRules::default(), Box::new(StubSource));
        batch.push(doc("a.pdf", VALID_TEXT));
        batch.push(doc("empty.pdf", ""));
        batch.push(doc("boom.pdf", ""));
        let outcome = batch.run();

        assert_eq!(outcome.transactions.len(), 2);
        assert_eq!(outcome.reports.len(), 3);
        assert!(outcome.reports[0].succeeded());
        assert_eq!(
            outcome.reports[1].error.as_deref(),
            Some("no text or tables extracted")
        );
        assert!(outcome.reports[2]
            .error
            .as_deref()
            .unwrap()
            .contains("collaborator exploded"));
    }

    #[test]
    fn test_missing_year_skips_document() {
        let text = VALID_TEXT.replace("Statement Period: 01 Sep 2025 to 30 Sep 2025", "ABSA");
        let mut batch = Batch::new(ParseRules::default(), Box::new(StubSource));
        batch.push(doc("noyear.pdf", &text));
        let outcome = batch.run();

        assert!(outcome.transactions.is_empty());
        assert_eq!(
            outcome.reports[0].error.as_deref(),
            Some("statement year not found")
        );
    }

    #[test]
    fn test_upload_order_preserved() {
        let second = VALID_TEXT.replace("05 Sep", "15 Sep").replace("06 Sep", "16 Sep");
        let mut batch = Batch::new(ParseRules::default(), Box::new(StubSource));
        batch.push(doc("a.pdf", VALID_TEXT));
        batch.push(doc("b.pdf", &second));
        let outcome = batch.run();

        let days: Vec<u32> = outcome
            .transactions
            .iter()
            .map(|t| chrono::Datelike::day(&t.date))
            .collect();
        assert_eq!(days, vec![5, 6, 15, 16]);
    }
}
