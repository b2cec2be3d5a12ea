use std::path::PathBuf;

/// Document-level failure. Aborts the whole conversion.
#[derive(Debug, thiserror::Error)]
pub enum PassbookError {
    #[error("input is not a PDF document (missing %PDF header)")]
    NotAPdf,

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to decode document: {0}")]
    Decode(String),

    #[error("failed to start page workers: {0}")]
    WorkerPool(String),

    #[error("failed to load config from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Page-level failure. The page is skipped and reported as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("page render failed: {0}")]
    Render(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("{0} not found on PATH")]
    ToolNotFound(&'static str),
}
