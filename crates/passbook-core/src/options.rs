use serde::{Deserialize, Serialize};

/// The configuration the extraction core recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// OCR every page, even when a text layer is present.
    pub force_ocr: bool,
    /// Append non-date lines between two transactions to the earlier one.
    pub merge_multiline_particulars: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            force_ocr: false,
            merge_multiline_particulars: true,
        }
    }
}
