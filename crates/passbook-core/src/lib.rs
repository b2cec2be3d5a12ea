pub mod assemble;
pub mod diagnostics;
pub mod error;
pub mod extraction;
pub mod model;
pub mod options;
pub mod parsing;
pub mod pipeline;

use error::PassbookError;
use extraction::{OcrProvider, PageRenderer, TextLayerProvider};
use model::ExtractionResult;
use parsing::PageInput;
use pipeline::{process_page, resolve_page_input, CancellationToken, OcrBackends, PagePool};

pub use options::ExtractOptions;

/// External collaborators needed to convert a PDF.
pub struct Backends<'a> {
    pub text_layer: &'a dyn TextLayerProvider,
    pub renderer: &'a dyn PageRenderer,
    pub ocr: &'a dyn OcrProvider,
}

/// Main API entry point: convert a bank statement PDF into a transaction table.
///
/// The document is decoded once; each page is then read from its text layer
/// (or OCRed when it has none, or when `force_ocr` is set) and parsed on a
/// worker pool. Page failures are reported as diagnostics on the result.
/// Only a document that cannot be decoded returns an error.
pub fn convert_pdf(
    pdf_bytes: &[u8],
    backends: &Backends<'_>,
    options: &ExtractOptions,
    cancel: &CancellationToken,
    workers: Option<usize>,
) -> Result<ExtractionResult, PassbookError> {
    let pages = backends.text_layer.extract_pages(pdf_bytes)?;
    tracing::debug!(
        backend = backends.text_layer.backend_name(),
        ocr = backends.ocr.backend_name(),
        pages = pages.len(),
        "document decoded"
    );

    let pool = PagePool::new(workers)?;
    let ocr = OcrBackends {
        renderer: backends.renderer,
        ocr: backends.ocr,
    };
    let jobs: Vec<_> = pages.into_iter().enumerate().map(|(i, tokens)| (i + 1, tokens)).collect();

    Ok(pool.run(jobs, cancel, |page_number, tokens| {
        let input = resolve_page_input(pdf_bytes, page_number, tokens, &ocr, options);
        process_page(page_number, input, options)
    }))
}

/// Convert already-recognized plain text (e.g. saved OCR output).
///
/// Pages are separated by form feeds (`\x0c`), the way pdftotext and
/// tesseract emit them.
pub fn convert_text(text: &str, options: &ExtractOptions) -> ExtractionResult {
    let mut assembler = assemble::TableAssembler::new();
    for (i, page_text) in text.split('\x0c').enumerate() {
        if page_text.trim().is_empty() && i > 0 {
            continue;
        }
        let input = Ok(PageInput::PlainText(page_text.to_string()));
        assembler.accept(process_page(i + 1, input, options));
    }
    assembler.finish()
}
