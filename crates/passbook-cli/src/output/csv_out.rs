use csv::WriterBuilder;
use passbook_core::error::PassbookError;
use passbook_core::model::ExtractionResult;
use std::io;

use super::export_layout;

/// Spreadsheet export: source name, header fields, a blank line, then the table.
pub fn to_csv_string(result: &ExtractionResult, source_name: &str) -> Result<String, PassbookError> {
    let mut bytes = Vec::new();
    for row in export_layout(result, source_name) {
        // The csv writer quotes an empty record as `""`; the spacer is a bare line break
        if row.is_empty() {
            bytes.push(b'\n');
            continue;
        }
        let mut writer = WriterBuilder::new().flexible(true).from_writer(bytes);
        writer.write_record(&row).map_err(io::Error::from)?;
        writer.flush()?;
        bytes = writer.into_inner().map_err(|e| e.into_error())?;
    }
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use passbook_core::model::{ColumnTemplate, HeaderField, HeaderFields, TransactionRow};

    #[test]
    fn test_export_layout() {
        let mut header = HeaderFields::new();
        header.set_if_absent(HeaderField::Account, "1234567890");
        header.set_if_absent(HeaderField::Bank, "State Bank");
        let result = ExtractionResult {
            header,
            columns: ColumnTemplate::default(),
            rows: vec![TransactionRow {
                date: "01-02-2024".into(),
                reference: "123456".into(),
                description: "NEFT, TRANSFER".into(),
                debit: "1,000.00".into(),
                ..Default::default()
            }],
            diagnostics: vec![],
            pages_processed: 1,
        };

        let csv = to_csv_string(&result, "march.pdf").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Source PDF,march.pdf",
                "Account,1234567890",
                "Bank,State Bank",
                "",
                "Tran Date,Chq No,Particulars,Debit,Credit,Balance",
                "01-02-2024,123456,\"NEFT, TRANSFER\",\"1,000.00\",,",
            ]
        );
    }

    #[test]
    fn test_export_without_rows() {
        let result = ExtractionResult {
            header: HeaderFields::new(),
            columns: ColumnTemplate::default(),
            rows: vec![],
            diagnostics: vec![],
            pages_processed: 1,
        };
        let csv = to_csv_string(&result, "empty.pdf").unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.ends_with("Tran Date,Chq No,Particulars,Debit,Credit,Balance\n"));
    }
}
