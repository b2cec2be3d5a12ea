use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    RenderFailed,
    OcrFailed,
    /// Cover, summary and blank pages land here. Not an error.
    NoTransactions,
    Cancelled,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::RenderFailed => write!(f, "render failed"),
            DiagnosticKind::OcrFailed => write!(f, "OCR failed"),
            DiagnosticKind::NoTransactions => write!(f, "no transactions"),
            DiagnosticKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A note recorded against one page of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDiagnostic {
    pub page_number: usize,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl PageDiagnostic {
    pub fn from_page_error(page_number: usize, err: &PageError) -> Self {
        let kind = match err {
            PageError::Render(_) => DiagnosticKind::RenderFailed,
            PageError::Ocr(_) | PageError::ToolNotFound(_) => DiagnosticKind::OcrFailed,
        };
        PageDiagnostic {
            page_number,
            kind,
            severity: Severity::Warning,
            message: err.to_string(),
        }
    }

    pub fn no_transactions(page_number: usize, line_count: usize) -> Self {
        PageDiagnostic {
            page_number,
            kind: DiagnosticKind::NoTransactions,
            severity: Severity::Info,
            message: format!("no transaction rows found in {line_count} line(s)"),
        }
    }

    pub fn cancelled(page_number: usize) -> Self {
        PageDiagnostic {
            page_number,
            kind: DiagnosticKind::Cancelled,
            severity: Severity::Warning,
            message: "conversion cancelled before this page started".to_string(),
        }
    }
}

impl fmt::Display for PageDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}: {}: {}", self.page_number, self.kind, self.message)
    }
}
