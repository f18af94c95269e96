//! Transaction table locator.
//!
//! Two source shapes feed the pipeline: already-segmented tables from
//! selectable-text PDFs (structured mode) and a single block of OCR text
//! (unstructured mode). Both funnel into `RawRow`s, with fee line items
//! filtered out before sign resolution.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use zabank_core::{AmountCells, ExtractedDocument, ParseRules, RawRow, Table};

/// Canonical column roles a statement header can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Date,
    Description,
    Debits,
    Credits,
    Fees,
    Amount,
    Balance,
}

/// Map one header cell to a role. Headers are normalized (lowercased,
/// currency suffix "(R)" dropped, whitespace collapsed) before matching the
/// synonym table, so "Debits (R)", "Debit (R)" and "Debit Amount" all land
/// on Debits.
fn role_for_header(header: &str) -> Option<Role> {
    let normalized = header
        .to_lowercase()
        .replace("(r)", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    match normalized.as_str() {
        "date" | "transaction date" | "txn date" => Some(Role::Date),
        "description" | "details" | "transaction details" | "narrative" => {
            Some(Role::Description)
        }
        "debit" | "debits" | "debit amount" => Some(Role::Debits),
        "credit" | "credits" | "credit amount" => Some(Role::Credits),
        "fee" | "fees" | "charges" | "service fee" => Some(Role::Fees),
        "amount" | "transaction amount" => Some(Role::Amount),
        "balance" | "running balance" | "closing balance" => Some(Role::Balance),
        _ => None,
    }
}

/// Locate candidate transaction rows in an extracted document.
///
/// Mode is chosen by data shape: any detected table means structured mode,
/// otherwise the unstructured line scanner runs over the full text. Rows
/// whose raw description names a bank fee are dropped here so they never
/// reach sign resolution.
pub fn locate_rows(doc: &ExtractedDocument, rules: &ParseRules) -> Vec<RawRow> {
    let rows = if doc.tables.is_empty() {
        rows_from_text(&doc.text, rules)
    } else {
        rows_from_tables(&doc.tables)
    };

    rows.into_iter()
        .filter(|row| {
            if rules.is_fee_row(&row.description) {
                debug!(description = %row.description, "dropping fee row");
                false
            } else {
                true
            }
        })
        .collect()
}

/// Structured mode: map each table's header cells to roles and pull rows
/// out by column index. A table without a Date and Description column, or
/// without either an Amount column or a Debits/Credits pair, contributes
/// nothing.
pub fn rows_from_tables(tables: &[Table]) -> Vec<RawRow> {
    let mut out = Vec::new();

    for table in tables {
        let find = |role: Role| {
            table
                .headers
                .iter()
                .position(|h| role_for_header(h) == Some(role))
        };

        let date_idx = find(Role::Date);
        let desc_idx = find(Role::Description);
        let debit_idx = find(Role::Debits);
        let credit_idx = find(Role::Credits);
        let amount_idx = find(Role::Amount);
        let balance_idx = find(Role::Balance);
        // The Fees column is recognized and then ignored: fee figures must
        // not be mistaken for transaction amounts.

        let (Some(date_idx), Some(desc_idx)) = (date_idx, desc_idx) else {
            debug!(headers = ?table.headers, "table lacks date/description columns, skipping");
            continue;
        };
        if debit_idx.is_none() && credit_idx.is_none() && amount_idx.is_none() {
            debug!(headers = ?table.headers, "table lacks monetary columns, skipping");
            continue;
        }

        for row in &table.rows {
            let cell = |idx: Option<usize>| -> Option<String> {
                idx.and_then(|i| row.get(i))
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
            };

            let date_fragment = cell(Some(date_idx)).unwrap_or_default();
            let description = cell(Some(desc_idx)).unwrap_or_default();
            if date_fragment.is_empty() && description.is_empty() {
                continue;
            }

            let cells = if debit_idx.is_some() || credit_idx.is_some() {
                AmountCells::Split {
                    debits: cell(debit_idx),
                    credits: cell(credit_idx),
                }
            } else {
                match cell(amount_idx) {
                    Some(amount) => AmountCells::Single(amount),
                    None => continue,
                }
            };

            out.push(RawRow {
                date_fragment,
                description,
                cells,
                balance_fragment: cell(balance_idx),
            });
        }
    }

    out
}

fn txn_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<date>\d{1,2} \w{3})\s+",
            r"(?P<desc>.+?)\s+",
            r"(?P<amount>[\d,]+\.\d{2})\s+",
            r"(?P<balance>[\d,]+\.\d{2} ?(?:Cr|Dr)?)\s+",
            r"(?P<accrued>[\d.]+)$"
        ))
        .unwrap()
    })
}

/// Unstructured mode: scan OCR text line by line. A header line opens the
/// table region; inside it, lines matching the fixed-width transaction
/// pattern become rows and a non-matching line naming a footer marker
/// closes the region. Other non-matching lines are continuation noise and
/// are skipped. The trailing accrued-charges figure is matched and
/// discarded.
pub fn rows_from_text(text: &str, rules: &ParseRules) -> Vec<RawRow> {
    let mut out = Vec::new();
    let mut in_table = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if !in_table {
            if rules.matches_header(line) {
                in_table = true;
            }
            continue;
        }

        if let Some(caps) = txn_line_re().captures(line) {
            out.push(RawRow {
                date_fragment: caps["date"].to_string(),
                description: caps["desc"].trim().to_string(),
                cells: AmountCells::Inferred(caps["amount"].to_string()),
                balance_fragment: Some(caps["balance"].trim().to_string()),
            });
        } else if rules.matches_footer(line) {
            in_table = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_header_synonyms_map_to_roles() {
        assert_eq!(role_for_header("Debits (R)"), Some(Role::Debits));
        assert_eq!(role_for_header("Debit (R)"), Some(Role::Debits));
        assert_eq!(role_for_header("Debit Amount"), Some(Role::Debits));
        assert_eq!(role_for_header("DATE"), Some(Role::Date));
        assert_eq!(role_for_header("Running  Balance"), Some(Role::Balance));
        assert_eq!(role_for_header("Branch Code"), None);
    }

    #[test]
    fn test_structured_split_columns() {
        let tables = [table(
            &["Date", "Description", "Debits (R)", "Credits (R)", "Balance"],
            &[
                &["01 Sep", "POS Purchase Woolworths", "150,00", "", "4 850,00"],
                &["02 Sep", "Direct Credit Salary", "", "12 000,00", "16 850,00"],
            ],
        )];
        let rows = rows_from_tables(&tables);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].cells,
            AmountCells::Split {
                debits: Some("150,00".to_string()),
                credits: None,
            }
        );
        assert_eq!(rows[0].balance_fragment.as_deref(), Some("4 850,00"));
    }

    #[test]
    fn test_structured_single_amount_column() {
        let tables = [table(
            &["Date", "Details", "Amount", "Balance"],
            &[&["03 Sep", "Internet Pmt To Landlord", "8 500,00 Dr", "8 350,00"]],
        )];
        let rows = rows_from_tables(&tables);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, AmountCells::Single("8 500,00 Dr".to_string()));
    }

    #[test]
    fn test_structured_fees_column_ignored() {
        let tables = [table(
            &["Date", "Description", "Fees", "Debits", "Credits"],
            &[&["04 Sep", "Woolworths", "5,00", "150,00", ""]],
        )];
        let rows = rows_from_tables(&tables);
        assert_eq!(rows.len(), 1);
        // The fee figure must not leak into the amount cells.
        assert_eq!(
            rows[0].cells,
            AmountCells::Split {
                debits: Some("150,00".to_string()),
                credits: None,
            }
        );
    }

    #[test]
    fn test_structured_unusable_table_skipped() {
        let tables = [table(&["Branch", "Code"], &[&["x", "y"]])];
        assert!(rows_from_tables(&tables).is_empty());
    }

    #[test]
    fn test_unstructured_scan_toggles_on_header_and_footer() {
        let rules = ParseRules::default();
        let text = "\
ABSA Bank Statement
Statement Period: 01 Sep 2025 to 30 Sep 2025

Date Description Amount Balance Accrued
05 Sep Geo Payment From John 500.00 2500.00Cr 0.00
06 Sep Woolworths Sandton 89.99 2410.01Cr 0.00
some ocr smudge that is not a row
Closing balance summary
07 Sep Should Not Appear 10.00 2400.01Cr 0.00
";
        let rows = rows_from_text(text, &rules);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date_fragment, "05 Sep");
        assert_eq!(rows[0].description, "Geo Payment From John");
        assert_eq!(rows[0].cells, AmountCells::Inferred("500.00".to_string()));
        assert_eq!(rows[0].balance_fragment.as_deref(), Some("2500.00Cr"));
        assert_eq!(rows[1].description, "Woolworths Sandton");
    }

    #[test]
    fn test_fee_rows_filtered_in_both_modes() {
        let rules = ParseRules::default();
        let doc = ExtractedDocument {
            text: String::new(),
            tables: vec![table(
                &["Date", "Description", "Debits", "Credits"],
                &[
                    &["01 Sep", "Monthly Account Fee", "60,00", ""],
                    &["01 Sep", "Woolworths", "150,00", ""],
                ],
            )],
        };
        let rows = locate_rows(&doc, &rules);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Woolworths");
    }
}
