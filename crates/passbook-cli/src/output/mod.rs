pub mod csv_out;
pub mod json;
pub mod table;
pub mod xlsx;

use crate::OutputFormat;
use passbook_core::error::PassbookError;
use passbook_core::model::ExtractionResult;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Spreadsheet rows shared by the CSV and XLSX exports: a `Source PDF` row,
/// one row per header field, an empty spacer row, the column names, then the
/// transactions.
pub fn export_layout(result: &ExtractionResult, source_name: &str) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["Source PDF".to_string(), source_name.to_string()]];
    for (field, value) in result.header.iter() {
        rows.push(vec![field.to_string(), value.to_string()]);
    }
    rows.push(Vec::new());
    rows.push(result.columns.names().to_vec());
    for row in &result.rows {
        rows.push(row.cells().iter().map(|c| c.to_string()).collect());
    }
    rows
}

/// Where the XLSX export goes when no `--out` is given: next to the input,
/// with `.pdf` swapped for `.xlsx`.
pub fn default_xlsx_path(source: &Path) -> PathBuf {
    source.with_extension("xlsx")
}

/// Render the result and write it to `out`, or to stdout when no file is given.
///
/// Diagnostics always go to stderr so stdout stays machine-readable.
pub fn emit(
    result: &ExtractionResult,
    format: OutputFormat,
    source: &Path,
    out: Option<PathBuf>,
) -> Result<(), PassbookError> {
    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    let rendered: Vec<u8> = match format {
        OutputFormat::Table => table::format_result(result, &source_name).into_bytes(),
        OutputFormat::Json => json::to_json_string(result)?.into_bytes(),
        OutputFormat::Csv => csv_out::to_csv_string(result, &source_name)?.into_bytes(),
        OutputFormat::Xlsx => xlsx::to_xlsx_bytes(result, &source_name)?,
    };

    for d in &result.diagnostics {
        eprintln!("  {d}");
    }

    // A workbook is binary, so it never goes to the terminal
    let out = match (out, format) {
        (None, OutputFormat::Xlsx) => Some(default_xlsx_path(source)),
        (out, _) => out,
    };

    match out {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            eprintln!(
                "Extracted {} transaction(s) from {} page(s), written to {}",
                result.rows.len(),
                result.pages_processed,
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
