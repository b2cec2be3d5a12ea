pub mod pdftoppm;
pub mod pdftotext;
pub mod tesseract;

use crate::error::{PageError, PassbookError};
use crate::model::TextToken;

/// A page rendered to a PNG image, ready for OCR.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page_number: usize,
    pub png: Vec<u8>,
}

/// Trait for PDF text layer backends.
pub trait TextLayerProvider: Send + Sync {
    /// Decode the document and return one token list per page.
    ///
    /// An empty list means the page has no extractable text and should be
    /// OCRed. A document that cannot be decoded at all is an error.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<Vec<TextToken>>, PassbookError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Trait for rasterizing a single page (1-based `page_number`).
pub trait PageRenderer: Send + Sync {
    fn render_page(&self, pdf_bytes: &[u8], page_number: usize) -> Result<RenderedPage, PageError>;
}

/// Trait for OCR engines. Returns the recognized plain text.
pub trait OcrProvider: Send + Sync {
    fn recognize(&self, page: &RenderedPage) -> Result<String, PageError>;

    fn backend_name(&self) -> &str;
}

/// Fail fast on input that is not a PDF at all.
pub fn check_pdf_magic(pdf_bytes: &[u8]) -> Result<(), PassbookError> {
    // The header may be preceded by a little junk; readers accept it within the first 1024 bytes.
    let window = &pdf_bytes[..pdf_bytes.len().min(1024)];
    if window.windows(5).any(|w| w == b"%PDF-") {
        Ok(())
    } else {
        Err(PassbookError::NotAPdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        assert!(check_pdf_magic(b"%PDF-1.7\n...").is_ok());
        assert!(check_pdf_magic(b"\xef\xbb\xbf%PDF-1.4").is_ok());
        assert!(matches!(check_pdf_magic(b"PK\x03\x04"), Err(PassbookError::NotAPdf)));
        assert!(matches!(check_pdf_magic(b""), Err(PassbookError::NotAPdf)));
    }
}
