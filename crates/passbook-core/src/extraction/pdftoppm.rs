use crate::error::PageError;
use crate::extraction::{PageRenderer, RenderedPage};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::process::Command;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

pub const DEFAULT_DPI: u32 = 300;

/// Page renderer backed by `pdftoppm` (poppler-utils).
///
/// The document is written to disk once and shared by every page rendered
/// from it; a different document replaces the staged copy.
#[derive(Debug)]
pub struct PdftoppmRenderer {
    dpi: u32,
    staged: Mutex<Option<StagedPdf>>,
}

#[derive(Debug)]
struct StagedPdf {
    fingerprint: u64,
    file: Arc<NamedTempFile>,
}

fn fingerprint(pdf_bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    pdf_bytes.hash(&mut hasher);
    hasher.finish()
}

impl PdftoppmRenderer {
    pub fn new(dpi: u32) -> Self {
        Self {
            dpi,
            staged: Mutex::new(None),
        }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// On-disk copy of `pdf_bytes`, written on first use.
    fn stage(&self, pdf_bytes: &[u8]) -> Result<Arc<NamedTempFile>, PageError> {
        let fingerprint = fingerprint(pdf_bytes);
        let mut staged = self
            .staged
            .lock()
            .map_err(|_| PageError::Render("staged PDF lock poisoned".to_string()))?;
        if let Some(current) = staged.as_ref() {
            if current.fingerprint == fingerprint {
                return Ok(Arc::clone(&current.file));
            }
        }

        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| PageError::Render(e.to_string()))?;
        file.write_all(pdf_bytes)
            .and_then(|_| file.flush())
            .map_err(|e| PageError::Render(e.to_string()))?;

        let file = Arc::new(file);
        *staged = Some(StagedPdf {
            fingerprint,
            file: Arc::clone(&file),
        });
        Ok(file)
    }
}

impl Default for PdftoppmRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DPI)
    }
}

impl PageRenderer for PdftoppmRenderer {
    fn render_page(&self, pdf_bytes: &[u8], page_number: usize) -> Result<RenderedPage, PageError> {
        let source = self.stage(pdf_bytes)?;
        let workdir = tempfile::tempdir().map_err(|e| PageError::Render(e.to_string()))?;

        // With -singlefile pdftoppm writes exactly `<prefix>.png`.
        let prefix = workdir.path().join("page");
        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(source.path())
            .arg(&prefix)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PageError::ToolNotFound("pdftoppm")
                } else {
                    PageError::Render(format!("failed to invoke pdftoppm: {e}"))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PageError::Render(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let image_path = prefix.with_extension("png");
        let png = std::fs::read(&image_path).map_err(|e| {
            PageError::Render(format!("expected rendered image {}: {e}", image_path.display()))
        })?;

        Ok(RenderedPage { page_number, png })
    }
}
