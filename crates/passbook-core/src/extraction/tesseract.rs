use crate::error::PageError;
use crate::extraction::{OcrProvider, RenderedPage};
use std::io::Write;
use std::process::Command;

/// OCR backend that shells out to the `tesseract` CLI.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    lang: String,
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self {
            lang: "eng".to_string(),
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrProvider for TesseractOcr {
    fn recognize(&self, page: &RenderedPage) -> Result<String, PageError> {
        let mut image = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| PageError::Ocr(e.to_string()))?;
        image
            .write_all(&page.png)
            .map_err(|e| PageError::Ocr(e.to_string()))?;

        let output = Command::new("tesseract")
            .arg(image.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PageError::ToolNotFound("tesseract")
                } else {
                    PageError::Ocr(format!("failed to invoke tesseract: {e}"))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PageError::Ocr(format!(
                "tesseract exited with {} on page {}: {}",
                output.status,
                page.page_number,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}
