use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::diagnostics::PageDiagnostic;

/// A positioned piece of text from a PDF text layer.
///
/// `y` grows upward (PDF user space), so the top of the page has the largest `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToken {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl TextToken {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        TextToken {
            text: text.into(),
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeaderField {
    Account,
    #[serde(rename = "IFSC")]
    Ifsc,
    Holder,
    Branch,
    Bank,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderField::Account => write!(f, "Account"),
            HeaderField::Ifsc => write!(f, "IFSC"),
            HeaderField::Holder => write!(f, "Holder"),
            HeaderField::Branch => write!(f, "Branch"),
            HeaderField::Bank => write!(f, "Bank"),
        }
    }
}

/// Document-level metadata. Once a field is set it is never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderFields(BTreeMap<HeaderField, String>);

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: HeaderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Set a field unless it is already present. Returns true if the value was stored.
    pub fn set_if_absent(&mut self, field: HeaderField, value: impl Into<String>) -> bool {
        if self.0.contains_key(&field) {
            return false;
        }
        self.0.insert(field, value.into());
        true
    }

    /// First-wins merge: keys already present are kept.
    pub fn merge_from(&mut self, other: &HeaderFields) {
        for (field, value) in &other.0 {
            self.set_if_absent(*field, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (HeaderField, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One normalized statement line. Amounts keep their source formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub date: String,
    pub reference: String,
    pub description: String,
    pub debit: String,
    pub credit: String,
    pub balance: String,
}

impl TransactionRow {
    /// A row may only be emitted with a description and at least one of debit/credit.
    pub fn is_valid(&self) -> bool {
        !self.description.is_empty() && (!self.debit.is_empty() || !self.credit.is_empty())
    }

    /// Cells in `ColumnTemplate` order.
    pub fn cells(&self) -> [&str; 6] {
        [
            self.date.as_str(),
            self.reference.as_str(),
            self.description.as_str(),
            self.debit.as_str(),
            self.credit.as_str(),
            self.balance.as_str(),
        ]
    }

    /// Rebuild the text that follows the date on the source line.
    pub fn remainder(&self) -> String {
        [
            &self.reference,
            &self.description,
            &self.debit,
            &self.credit,
            &self.balance,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Parse a formatted amount like "48,000.00" exactly. Empty cells give None.
pub fn amount_value(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(&s.replace(',', "")).ok()
}

pub const DEFAULT_COLUMNS: [&str; 6] = ["Tran Date", "Chq No", "Particulars", "Debit", "Credit", "Balance"];

/// Output column ordering, locked once per document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnTemplate(Vec<String>);

impl ColumnTemplate {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl Default for ColumnTemplate {
    fn default() -> Self {
        ColumnTemplate(DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub header: HeaderFields,
    pub columns: ColumnTemplate,
    pub rows: Vec<TransactionRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<PageDiagnostic>,
    pub pages_processed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_header_first_wins() {
        let mut acc = HeaderFields::new();
        acc.set_if_absent(HeaderField::Account, "111111");

        let mut later = HeaderFields::new();
        later.set_if_absent(HeaderField::Account, "222222");
        later.set_if_absent(HeaderField::Bank, "State Bank");

        acc.merge_from(&later);
        assert_eq!(acc.get(HeaderField::Account), Some("111111"));
        assert_eq!(acc.get(HeaderField::Bank), Some("State Bank"));
    }

    #[test]
    fn test_header_serializes_field_names() {
        let mut h = HeaderFields::new();
        h.set_if_absent(HeaderField::Ifsc, "HDFC0001234");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"IFSC":"HDFC0001234"}"#);
    }

    #[test]
    fn test_row_invariant() {
        let mut row = TransactionRow {
            date: "01-01-24".into(),
            description: "NEFT".into(),
            ..Default::default()
        };
        assert!(!row.is_valid());
        row.credit = "10.00".into();
        assert!(row.is_valid());
        row.description.clear();
        assert!(!row.is_valid());
    }

    #[test]
    fn test_remainder_skips_empty_cells() {
        let row = TransactionRow {
            date: "01-02-2024".into(),
            reference: "123456".into(),
            description: "NEFT TRANSFER".into(),
            debit: "1,000.00".into(),
            ..Default::default()
        };
        assert_eq!(row.remainder(), "123456 NEFT TRANSFER 1,000.00");
    }

    #[test]
    fn test_amount_value() {
        assert_eq!(amount_value("48,000.00"), Some(dec!(48000.00)));
        assert_eq!(amount_value("12"), Some(dec!(12)));
        assert_eq!(amount_value(""), None);
    }

    #[test]
    fn test_default_template() {
        let t = ColumnTemplate::default();
        assert_eq!(t.names().len(), 6);
        assert_eq!(t.names()[2], "Particulars");
    }
}
