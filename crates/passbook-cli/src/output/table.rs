use passbook_core::model::{amount_value, ExtractionResult, TransactionRow};
use rust_decimal::Decimal;
use std::fmt::Write;

/// Debit, Credit and Balance are right-aligned.
const FIRST_AMOUNT_COLUMN: usize = 3;

pub fn format_result(result: &ExtractionResult, source_name: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ===\n", source_name);

    if result.header.is_empty() {
        let _ = writeln!(out, "  (no header fields detected)");
    } else {
        let width = result
            .header
            .iter()
            .map(|(field, _)| field.to_string().len())
            .max()
            .unwrap_or(0);
        for (field, value) in result.header.iter() {
            let _ = writeln!(out, "  {:<width$}  {}", field.to_string(), value, width = width);
        }
    }
    out.push('\n');

    if result.rows.is_empty() {
        let _ = writeln!(
            out,
            "  No transactions found in {} page(s).",
            result.pages_processed
        );
        return out;
    }

    let columns: Vec<&str> = result.columns.names().iter().map(String::as_str).collect();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &result.rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    push_row(&mut out, &columns, &widths);
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rules: Vec<&str> = rules.iter().map(String::as_str).collect();
    push_row(&mut out, &rules, &widths);
    for row in &result.rows {
        push_row(&mut out, &row.cells(), &widths);
    }

    let (debit, credit) = totals(&result.rows);
    let _ = writeln!(
        out,
        "\n  {} transaction(s) from {} page(s)",
        result.rows.len(),
        result.pages_processed
    );
    let _ = writeln!(out, "  Total debit:  {}", debit);
    let _ = writeln!(out, "  Total credit: {}", credit);

    out
}

fn push_row(out: &mut String, cells: &[&str], widths: &[usize]) {
    let mut line = String::from(" ");
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i >= FIRST_AMOUNT_COLUMN {
            let _ = write!(line, " {:>width$}", cell, width = width);
        } else {
            let _ = write!(line, " {:<width$}", cell, width = width);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Sum of the debit and credit columns. Cells that do not parse are skipped.
fn totals(rows: &[TransactionRow]) -> (Decimal, Decimal) {
    rows.iter().fold((Decimal::ZERO, Decimal::ZERO), |(d, c), row| {
        (
            d + amount_value(&row.debit).unwrap_or_default(),
            c + amount_value(&row.credit).unwrap_or_default(),
        )
    })
}
