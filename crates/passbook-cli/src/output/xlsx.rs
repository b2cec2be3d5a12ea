use passbook_core::error::PassbookError;
use passbook_core::model::ExtractionResult;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::io;

use super::export_layout;

pub const SHEET_NAME: &str = "Transactions";

fn xlsx_error(e: XlsxError) -> PassbookError {
    io::Error::other(format!("failed to build workbook: {e}")).into()
}

/// Workbook with a single `Transactions` sheet in the export layout.
///
/// Cells are written as text so amounts keep their source formatting.
pub fn to_xlsx_bytes(result: &ExtractionResult, source_name: &str) -> Result<Vec<u8>, PassbookError> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).map_err(xlsx_error)?;
        for (r, row) in export_layout(result, source_name).iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                sheet
                    .write_string(r as u32, c as u16, cell.as_str())
                    .map_err(xlsx_error)?;
            }
        }
        sheet.autofit();
    }
    workbook.save_to_buffer().map_err(xlsx_error)
}
