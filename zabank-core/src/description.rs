//! Description cleanup for accounting-software import.
//!
//! Bank statement descriptions carry reference numbers, serial codes and
//! channel boilerplate ("POS Purchase", "Immediate Payment", ...) that only
//! get in the way of reconciliation matching.

use regex::Regex;
use std::sync::OnceLock;

fn date_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\s*\d{6}\s+\d{4}\s+\d{2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)",
        )
        .unwrap()
    })
}

fn labeled_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:Ref\s*|Reference\s*|No\s*|Nr\s*|ID\s*):\s*[\w\-]+").unwrap())
}

fn serial_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Serial:\d+/\d+").unwrap())
}

fn boilerplate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)(?:POS Purchase|ATM Withdrawal|Immediate Payment|Internet Pmt To",
            r"|Teller Transfer Debit|Direct Credit|EFT|IB Payment)\s*",
        ))
        .unwrap()
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").unwrap())
}

/// Strip reference noise and channel boilerplate from a description.
///
/// Never fails; worst case returns the trimmed original. Idempotent.
pub fn sanitize_description(raw: &str) -> String {
    let mut desc = raw.trim().to_string();

    desc = date_ref_re().replace_all(&desc, "").into_owned();
    desc = labeled_ref_re().replace_all(&desc, "").into_owned();
    desc = serial_re().replace_all(&desc, "").into_owned();
    desc = boilerplate_re().replace_all(&desc, "").into_owned();

    desc = whitespace_re().replace_all(&desc, " ").into_owned();
    desc.trim_matches(|c| c == ' ' || c == '-').trim().to_string()
}
