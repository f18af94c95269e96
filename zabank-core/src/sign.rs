//! Sign resolution: turn a row's amount cells into one signed value.

use crate::amount::parse_amount;
use crate::rules::ParseRules;
use crate::types::AmountCells;
use tracing::debug;

/// Resolve a row's signed amount.
///
/// - `Split`: credits minus debits, with missing or unparseable cells
///   counted as zero.
/// - `Single`: the normalizer's Dr/Cr handling supplies the sign.
/// - `Inferred`: polarity comes from credit keywords in the description.
///   This is a heuristic with false-positive risk on ambiguous wording, so
///   every decision is logged at debug level for review.
///
/// `None` means the row carries no usable amount and should be dropped.
pub fn resolve_amount(cells: &AmountCells, description: &str, rules: &ParseRules) -> Option<f64> {
    match cells {
        AmountCells::Split { debits, credits } => {
            let debit = debits.as_deref().and_then(parse_amount).unwrap_or(0.0);
            let credit = credits.as_deref().and_then(parse_amount).unwrap_or(0.0);
            Some(credit - debit)
        }
        AmountCells::Single(cell) => parse_amount(cell),
        AmountCells::Inferred(cell) => {
            let magnitude = parse_amount(cell)?.abs();
            match rules.credit_keyword_match(description) {
                Some(keyword) => {
                    debug!(keyword, description, "credit keyword matched, amount kept positive");
                    Some(magnitude)
                }
                None => {
                    debug!(description, "no credit keyword, amount negated");
                    Some(-magnitude)
                }
            }
        }
    }
}
