use passbook_core::error::PassbookError;
use passbook_core::extraction::pdftoppm::PdftoppmRenderer;
use passbook_core::extraction::pdftotext::PdftotextExtractor;
use passbook_core::extraction::tesseract::TesseractOcr;
use passbook_core::pipeline::CancellationToken;
use passbook_core::{Backends, ExtractOptions};
use std::path::PathBuf;

use crate::output;
use crate::OutputFormat;

pub struct ConvertArgs {
    pub input_file: PathBuf,
    pub output: OutputFormat,
    pub out: Option<PathBuf>,
    pub options: ExtractOptions,
    pub jobs: Option<usize>,
    pub ocr_lang: String,
    pub dpi: u32,
}

/// Token that Ctrl-C cancels. A second Ctrl-C exits immediately.
///
/// If a handler cannot be installed the conversion simply runs uncancellable.
pub fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    let installed = ctrlc::set_handler(move || {
        if handler_token.is_cancelled() {
            std::process::exit(130);
        }
        eprintln!("Interrupted: finishing pages already started, press Ctrl-C again to abort");
        handler_token.cancel();
    });
    if let Err(e) = installed {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }
    cancel
}

pub fn run(args: ConvertArgs) -> Result<(), PassbookError> {
    if !PdftotextExtractor::is_available() {
        return Err(PassbookError::PdftotextNotFound);
    }

    let pdf_bytes = std::fs::read(&args.input_file)?;

    let text_layer = PdftotextExtractor::new();
    let renderer = PdftoppmRenderer::new(args.dpi);
    let ocr = TesseractOcr::new().with_lang(args.ocr_lang);
    let backends = Backends {
        text_layer: &text_layer,
        renderer: &renderer,
        ocr: &ocr,
    };

    tracing::info!(
        file = %args.input_file.display(),
        force_ocr = args.options.force_ocr,
        dpi = renderer.dpi(),
        lang = ocr.lang(),
        "converting statement"
    );

    let cancel = cancel_on_interrupt();
    let result =
        passbook_core::convert_pdf(&pdf_bytes, &backends, &args.options, &cancel, args.jobs)?;

    output::emit(&result, args.output, &args.input_file, args.out)
}
