//! SA-locale numeric normalizer.
//!
//! South African statements print amounts like "1 234,56", "1.234,56" or
//! "R 150.00 Dr": comma as the decimal separator, dot or space as thousands
//! grouping, and Dr/Cr markers carrying the sign.

use regex::Regex;
use std::sync::OnceLock;

fn digit_gap_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)\s+(\d)").unwrap())
}

/// Parse a locale-formatted amount string into a signed value.
///
/// A `Dr` marker (any case, any position) forces a negative result and `Cr`
/// forces a non-negative one, regardless of any sign character in the
/// string. Returns `None` on anything unparseable; callers decide whether a
/// missing value drops the row or counts as zero.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut value = raw.trim().replace(['\n', '\r'], "");
    if value.is_empty() {
        return None;
    }

    // Detect markers before stripping anything: removing the "R" currency
    // symbol would otherwise eat the r of Dr/Cr.
    let lower = value.to_lowercase();
    let is_debit = lower.contains("dr");
    let is_credit = !is_debit && lower.contains("cr");

    // Currency symbols, then whitespace sitting between two digits
    // (space used as a thousands separator).
    value = value.replace(['R', 'r', '$'], "");
    value = digit_gap_re().replace_all(&value, "$1$2").into_owned();

    // Separator disambiguation: with both present, dots are thousands and
    // the comma is the decimal point; a lone comma is the decimal point.
    if value.contains(',') && value.contains('.') {
        value = value.replace('.', "").replace(',', ".");
    } else if value.contains(',') {
        value = value.replace(',', ".");
    }
    value = value.replace(' ', "");

    let keep_digits = |s: &str, allow_minus: bool| -> String {
        s.chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || (allow_minus && *c == '-'))
            .collect()
    };

    let cleaned = if is_debit {
        format!("-{}", keep_digits(&value, false))
    } else if is_credit {
        keep_digits(&value, false)
    } else {
        keep_digits(&value, true)
    };

    cleaned.parse::<f64>().ok()
}
