use passbook_core::error::PassbookError;
use passbook_core::ExtractOptions;
use std::path::PathBuf;

use crate::output;
use crate::OutputFormat;

pub fn run(
    input_file: PathBuf,
    output_format: OutputFormat,
    output_file: Option<PathBuf>,
    options: ExtractOptions,
) -> Result<(), PassbookError> {
    let text = std::fs::read_to_string(&input_file)?;
    let result = passbook_core::convert_text(&text, &options);
    output::emit(&result, output_format, &input_file, output_file)
}
