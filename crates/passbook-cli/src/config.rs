use passbook_core::error::PassbookError;
use passbook_core::ExtractOptions;
use std::fs;
use std::path::Path;

/// Load options from an optional TOML file, then apply command-line flags on top.
pub fn resolve_options(
    path: Option<&Path>,
    force_ocr: bool,
    no_merge_particulars: bool,
) -> Result<ExtractOptions, PassbookError> {
    let mut options = match path {
        Some(p) => load_config(p)?,
        None => ExtractOptions::default(),
    };
    if force_ocr {
        options.force_ocr = true;
    }
    if no_merge_particulars {
        options.merge_multiline_particulars = false;
    }
    Ok(options)
}

pub fn load_config(path: &Path) -> Result<ExtractOptions, PassbookError> {
    let s = fs::read_to_string(path).map_err(|e| PassbookError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    toml::from_str(&s).map_err(|e| PassbookError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
