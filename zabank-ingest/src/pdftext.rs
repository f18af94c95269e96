//! Selectable-text backend: `pdftotext -layout` plus table detection.
//!
//! `-layout` preserves column alignment, so a statement table shows up as a
//! header line whose cells are separated by runs of 2+ spaces, followed by
//! data lines aligned to the same columns. Tables are cut out of the layout
//! text by slicing each line at the header's column start positions.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::Command;
use zabank_core::{ExtractedDocument, RawDocument, Table};

use crate::source::DocumentSource;

pub struct PdfTextSource;

impl DocumentSource for PdfTextSource {
    fn name(&self) -> &'static str {
        "pdftotext"
    }

    fn extract(&self, doc: &RawDocument) -> Result<ExtractedDocument> {
        which::which("pdftotext")
            .map_err(|_| anyhow::anyhow!("pdftotext not installed (poppler-utils)"))?;

        let mut tmp = tempfile::NamedTempFile::new().context("creating temp pdf")?;
        tmp.write_all(&doc.bytes)
            .with_context(|| format!("writing temp copy of {}", doc.name))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmp.path())
            .arg("-")
            .output()
            .context("running pdftotext")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("pdftotext failed for {}: {}", doc.name, stderr.trim());
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let tables = text
            .split('\x0c') // form feed separates pages
            .flat_map(detect_tables)
            .collect();

        Ok(ExtractedDocument { text, tables })
    }
}

/// Find column-aligned tables in one page of layout text.
///
/// A header line is one whose 2+-space-separated cells include a date
/// header and a monetary header; the cells' start offsets anchor the
/// columns. Data lines are sliced at those offsets until a blank line
/// closes the table.
fn detect_tables(page: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Option<(Vec<usize>, Table)> = None;

    for line in page.lines() {
        if line.trim().is_empty() {
            if let Some((_, table)) = current.take() {
                tables.push(table);
            }
            continue;
        }

        if let Some((starts, table)) = current.as_mut() {
            let cells: Vec<String> = starts
                .iter()
                .enumerate()
                .map(|(i, &start)| {
                    let end = starts.get(i + 1).copied().unwrap_or(line.len());
                    slice_columns(line, start, end).trim().to_string()
                })
                .collect();
            table.rows.push(cells);
            continue;
        }

        let cells = split_header_cells(line);
        if is_table_header(&cells) {
            let starts = column_starts(line);
            current = Some((
                starts,
                Table {
                    headers: cells,
                    rows: Vec::new(),
                },
            ));
        }
    }

    if let Some((_, table)) = current {
        tables.push(table);
    }

    tables.into_iter().filter(|t| !t.rows.is_empty()).collect()
}

fn split_header_cells(line: &str) -> Vec<String> {
    line.split("  ")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_table_header(cells: &[String]) -> bool {
    if cells.len() < 3 {
        return false;
    }
    let lower: Vec<String> = cells.iter().map(|c| c.to_lowercase()).collect();
    let has_date = lower.iter().any(|c| c.contains("date"));
    let has_money = lower
        .iter()
        .any(|c| c.contains("amount") || c.contains("debit") || c.contains("credit"));
    has_date && has_money
}

/// Byte offsets where header cells begin: a non-space preceded by 2+
/// spaces (or the line start).
fn column_starts(header: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut spaces = 2;
    for (i, ch) in header.char_indices() {
        if ch == ' ' {
            spaces += 1;
        } else {
            if spaces >= 2 {
                starts.push(i);
            }
            spaces = 0;
        }
    }
    starts
}

/// Slice a line between two column offsets, tolerating short lines and
/// multi-byte characters at the boundary.
fn slice_columns(line: &str, start: usize, end: usize) -> &str {
    let mut s = start.min(line.len());
    while s < line.len() && !line.is_char_boundary(s) {
        s += 1;
    }
    let mut e = end.min(line.len());
    while e > s && !line.is_char_boundary(e) {
        e -= 1;
    }
    &line[s..e]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_aligned_table() {
        let page = "\
ABSA Bank Statement
Statement Date: 03/10/2025

Date        Description                  Debits (R)    Credits (R)    Balance
01 Sep      POS Purchase Woolworths      150,00                       4 850,00
02 Sep      Direct Credit Salary                       12 000,00      16 850,00

Closing balance 16 850,00
";
        let tables = detect_tables(page);
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(
            table.headers,
            vec!["Date", "Description", "Debits (R)", "Credits (R)", "Balance"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "01 Sep");
        assert_eq!(table.rows[0][1], "POS Purchase Woolworths");
        assert_eq!(table.rows[0][2], "150,00");
        assert_eq!(table.rows[1][3], "12 000,00");
    }

    #[test]
    fn test_no_table_in_prose() {
        let page = "Dear customer,\nyour statement is attached.\nRegards";
        assert!(detect_tables(page).is_empty());
    }

    #[test]
    fn test_short_lines_do_not_panic() {
        let page = "Date        Description        Amount\n01 Sep\n";
        let tables = detect_tables(page);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[0][0], "01 Sep");
        assert_eq!(tables[0].rows[0][2], "");
    }
}
