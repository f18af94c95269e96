//! Statement-year discovery and partial-date completion.
//!
//! Statement rows carry dates like "01 Sep" with no year; the year lives in
//! the statement header ("Statement Period ..." / "Statement Date ...").

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:Statement Period|Statement Date).*?(\d{4})").unwrap())
}

/// A four-digit statement year discovered in one document's text.
///
/// Scoped to that document; never shared across documents in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementYear(String);

impl StatementYear {
    /// First "Statement Period"/"Statement Date" marker followed by a
    /// four-digit number, on the same line. `None` is document-fatal:
    /// partial dates cannot be completed without a year.
    pub fn find_in_text(text: &str) -> Option<Self> {
        year_re()
            .captures(text)
            .map(|caps| Self(caps[1].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Formats tried when the strict day-month-year completion fails: the row
/// may already carry a complete date in one of the common layouts.
const FALLBACK_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %B %Y",
];

/// Complete a partial date fragment ("01 Sep") against the statement year.
///
/// Falls back to a day-first parse of the fragment alone for rows that
/// already carry a full date. `None` drops the row.
pub fn complete_date(fragment: &str, year: &StatementYear) -> Option<NaiveDate> {
    let fragment = fragment.trim();
    let with_year = format!("{fragment} {}", year.as_str());
    if let Ok(date) = NaiveDate::parse_from_str(&with_year, "%d %b %Y") {
        return Some(date);
    }

    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(fragment, fmt).ok())
}
