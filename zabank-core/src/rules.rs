//! Parse-rule configuration data.
//!
//! Header/footer markers, credit keywords and fee keywords are data, not
//! code: new statement layouts get a rules file, not a parser change. All
//! matching is lowercase-substring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseRules {
    /// Tokens that must all appear, in order, on a line for it to open the
    /// transaction table in unstructured text.
    pub header_markers: Vec<String>,
    /// Tokens any of which closes the table region.
    pub footer_markers: Vec<String>,
    /// Description keywords marking a row as money-in when no explicit
    /// debit/credit column exists.
    pub credit_keywords: Vec<String>,
    /// Description keywords marking a row as a bank service charge.
    pub fee_keywords: Vec<String>,
}

impl Default for ParseRules {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            header_markers: strings(&["date", "description", "amount", "balance", "accrued"]),
            footer_markers: strings(&["total", "balance", "summary", "closing", "turnover"]),
            credit_keywords: strings(&[
                "from",
                "credit",
                "deposit",
                "rtc",
                "geo payment from",
                "credit absa",
            ]),
            fee_keywords: strings(&["fee", "charge", "service"]),
        }
    }
}

impl ParseRules {
    /// True for bank-levied service charges, which never count as customer
    /// transactions.
    pub fn is_fee_row(&self, description: &str) -> bool {
        let lower = description.to_lowercase();
        self.fee_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// True when the line contains any table-closing marker.
    pub fn matches_footer(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.footer_markers.iter().any(|k| lower.contains(k.as_str()))
    }

    /// True when every header marker appears on the line in order.
    pub fn matches_header(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        let mut pos = 0;
        for marker in &self.header_markers {
            match lower[pos..].find(marker.as_str()) {
                Some(i) => pos += i + marker.len(),
                None => return false,
            }
        }
        !self.header_markers.is_empty()
    }

    /// First credit keyword the description contains, if any.
    pub fn credit_keyword_match(&self, description: &str) -> Option<&str> {
        let lower = description.to_lowercase();
        self.credit_keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_markers_in_order() {
        let rules = ParseRules::default();
        assert!(rules.matches_header("Date Description Amount Balance Accrued Charges"));
        assert!(rules.matches_header("DATE   DESCRIPTION   AMOUNT   BALANCE   ACCRUED"));
        // Out of order does not open the table.
        assert!(!rules.matches_header("Description Date Amount Balance Accrued"));
        assert!(!rules.matches_header("Date Amount Balance"));
    }

    #[test]
    fn test_footer_markers() {
        let rules = ParseRules::default();
        assert!(rules.matches_footer("Closing Balance"));
        assert!(rules.matches_footer("MONTHLY TURNOVER"));
        assert!(!rules.matches_footer("05 Sep Groceries 100.00"));
    }

    #[test]
    fn test_fee_rows() {
        let rules = ParseRules::default();
        assert!(rules.is_fee_row("Monthly Account Fee"));
        assert!(rules.is_fee_row("SERVICE CHARGE"));
        assert!(!rules.is_fee_row("Woolworths"));
    }

    #[test]
    fn test_credit_keywords() {
        let rules = ParseRules::default();
        assert_eq!(
            rules.credit_keyword_match("Geo Payment From John"),
            Some("from")
        );
        assert_eq!(rules.credit_keyword_match("Woolworths Sandton"), None);
    }

    #[test]
    fn test_partial_toml_override_keeps_defaults() {
        let rules: ParseRules =
            toml::from_str(r#"fee_keywords = ["levy"]"#).unwrap();
        assert_eq!(rules.fee_keywords, vec!["levy".to_string()]);
        assert_eq!(rules.footer_markers, ParseRules::default().footer_markers);
    }
}
