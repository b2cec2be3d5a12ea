use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use crate::assemble::{PageOutcome, TableAssembler};
use crate::diagnostics::PageDiagnostic;
use crate::error::{PageError, PassbookError};
use crate::extraction::{OcrProvider, PageRenderer};
use crate::model::{ExtractionResult, TextToken};
use crate::options::ExtractOptions;
use crate::parsing::{parse_page, PageInput};

/// Cooperative cancellation flag shared between the caller and page workers.
///
/// Workers check it before starting a page; a page already running finishes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bounded worker pool for per-page work.
pub struct PagePool {
    pool: ThreadPool,
}

impl PagePool {
    /// `workers = None` sizes the pool to the host's available parallelism.
    pub fn new(workers: Option<usize>) -> Result<Self, PassbookError> {
        let threads = workers
            .filter(|n| *n > 0)
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("passbook-page-{i}"))
            .build()
            .map_err(|e| PassbookError::WorkerPool(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `work` for every job and assemble the outcomes.
    ///
    /// Outcomes reach the assembler in completion order; the assembler
    /// restores page order.
    pub fn run<T, F>(&self, jobs: Vec<(usize, T)>, cancel: &CancellationToken, work: F) -> ExtractionResult
    where
        T: Send,
        F: Fn(usize, T) -> PageOutcome + Sync,
    {
        let (tx, rx) = mpsc::channel();
        self.pool.install(|| {
            jobs.into_par_iter().for_each_with(tx, |tx, (page_number, job)| {
                let outcome = if cancel.is_cancelled() {
                    tracing::debug!(page_number, "skipping page after cancellation");
                    PageOutcome::Cancelled { page_number }
                } else {
                    work(page_number, job)
                };
                // The receiver outlives the pool scope, so send cannot fail here.
                let _ = tx.send(outcome);
            });
        });

        let mut assembler = TableAssembler::new();
        for outcome in rx {
            assembler.accept(outcome);
        }
        assembler.finish()
    }
}

/// Page-level collaborators used when a page has to be OCRed.
pub struct OcrBackends<'a> {
    pub renderer: &'a dyn PageRenderer,
    pub ocr: &'a dyn OcrProvider,
}

/// Decide how a page's text is obtained: its text layer, or render + OCR.
pub fn resolve_page_input(
    pdf_bytes: &[u8],
    page_number: usize,
    tokens: Vec<TextToken>,
    backends: &OcrBackends<'_>,
    options: &ExtractOptions,
) -> Result<PageInput, PageError> {
    if !options.force_ocr && !tokens.is_empty() {
        return Ok(PageInput::PositionedTokens(tokens));
    }

    tracing::debug!(page_number, forced = options.force_ocr, "running OCR");
    let image = backends.renderer.render_page(pdf_bytes, page_number)?;
    let text = backends.ocr.recognize(&image)?;
    Ok(PageInput::PlainText(text))
}

/// Parse one page, turning recoverable failures into a diagnostic outcome.
pub fn process_page(
    page_number: usize,
    input: Result<PageInput, PageError>,
    options: &ExtractOptions,
) -> PageOutcome {
    match input {
        Ok(input) => {
            let page = parse_page(input, options.merge_multiline_particulars);
            tracing::debug!(
                page_number,
                lines = page.line_count,
                rows = page.rows.len(),
                header_fields = page.header.len(),
                "page parsed"
            );
            PageOutcome::Parsed { page_number, page }
        }
        Err(err) => {
            tracing::warn!(page_number, error = %err, "page skipped");
            PageOutcome::Failed {
                page_number,
                diagnostic: PageDiagnostic::from_page_error(page_number, &err),
            }
        }
    }
}
