//! CSV export: `Date,Description,Amount`, dates `DD/MM/YYYY`, amounts with
//! exactly two fractional digits. The column order is what accounting
//! imports expect; nothing else is written.

use anyhow::{Context, Result};
use std::io::Write;
use zabank_core::Transaction;

/// Write the combined transactions as CSV, header row included.
pub fn write_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Description", "Amount"])
        .context("writing CSV header")?;

    for txn in transactions {
        wtr.write_record([
            txn.date.format("%d/%m/%Y").to_string(),
            txn.description.clone(),
            format!("{:.2}", txn.amount),
        ])
        .context("writing CSV row")?;
    }

    wtr.flush().context("flushing CSV")?;
    Ok(())
}

/// Render the CSV in memory, for callers that hand bytes to a download
/// rather than a file.
pub fn csv_string(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(transactions, &mut buf)?;
    String::from_utf8(buf).context("CSV is not valid UTF-8")
}
