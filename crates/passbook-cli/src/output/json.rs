use passbook_core::error::PassbookError;
use passbook_core::model::ExtractionResult;

pub fn to_json_string(result: &ExtractionResult) -> Result<String, PassbookError> {
    Ok(serde_json::to_string_pretty(result)?)
}
