//! Integration tests for convert_pdf() end-to-end pipeline.
//!
//! Uses mock text layer, renderer and OCR backends so these tests run
//! without poppler-utils or tesseract.

use passbook_core::diagnostics::DiagnosticKind;
use passbook_core::error::{PageError, PassbookError};
use passbook_core::extraction::{OcrProvider, PageRenderer, RenderedPage, TextLayerProvider};
use passbook_core::model::{ColumnTemplate, HeaderField, TextToken};
use passbook_core::pipeline::CancellationToken;
use passbook_core::{convert_pdf, Backends, ExtractOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

struct MockTextLayer {
    pages: Vec<Vec<TextToken>>,
}

impl TextLayerProvider for MockTextLayer {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<Vec<TextToken>>, PassbookError> {
        if pdf_bytes == b"garbage" {
            return Err(PassbookError::Decode("unreadable xref table".into()));
        }
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

/// Renders every page successfully; OCR text is looked up per page.
#[derive(Default)]
struct MockOcr {
    texts: HashMap<usize, Result<String, PageError>>,
    calls: AtomicUsize,
}

impl PageRenderer for MockOcr {
    fn render_page(&self, _pdf_bytes: &[u8], page_number: usize) -> Result<RenderedPage, PageError> {
        Ok(RenderedPage {
            page_number,
            png: vec![0x89, b'P', b'N', b'G'],
        })
    }
}

impl OcrProvider for MockOcr {
    fn recognize(&self, page: &RenderedPage) -> Result<String, PageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts
            .get(&page.page_number)
            .cloned()
            .unwrap_or_else(|| Ok(String::new()))
    }

    fn backend_name(&self) -> &str {
        "mock-ocr"
    }
}

/// Lay out lines top to bottom, splitting each on spaces into tokens.
fn page(lines: &[&str]) -> Vec<TextToken> {
    let mut tokens = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let y = 780.0 - row as f32 * 14.0;
        for (col, word) in line.split_whitespace().enumerate() {
            tokens.push(TextToken::new(word, 20.0 + col as f32 * 60.0, y));
        }
    }
    // Text layers rarely arrive in reading order.
    tokens.reverse();
    tokens
}

fn run(
    text_layer: &MockTextLayer,
    ocr: &MockOcr,
    options: &ExtractOptions,
) -> Result<passbook_core::model::ExtractionResult, PassbookError> {
    let backends = Backends {
        text_layer,
        renderer: ocr,
        ocr,
    };
    convert_pdf(b"%PDF-1.7", &backends, options, &CancellationToken::new(), Some(3))
}

// ---------------------------------------------------------------------------
// Test 1: text layer pages, header from the first page, rows in page order
// ---------------------------------------------------------------------------
#[test]
fn multi_page_text_layer() {
    let text_layer = MockTextLayer {
        pages: vec![
            page(&[
                "HDFC BANK LTD statement",
                "Account No: 1234567890",
                "IFSC: HDFC0001234",
                "Date Particulars Debit Credit Balance",
                "15-03-24 ATM-CASH WITHDRAWAL 2,000.00 48,000.00",
                "16-03-24 SALARY CREDIT 50,000.00",
            ]),
            page(&[
                "Account No: 5555555555",
                "01-04-2024 123456 NEFT TRANSFER 1,000.00",
                "02-04-2024 POS AMAZON 10.00 20.00 30.00",
            ]),
        ],
    };
    let ocr = MockOcr::default();

    let result = run(&text_layer, &ocr, &ExtractOptions::default()).unwrap();

    assert_eq!(result.header.get(HeaderField::Account), Some("1234567890"));
    assert_eq!(result.header.get(HeaderField::Ifsc), Some("HDFC0001234"));
    assert_eq!(result.columns, ColumnTemplate::default());
    assert_eq!(result.rows.len(), 4);

    let dates: Vec<&str> = result.rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["15-03-24", "16-03-24", "01-04-2024", "02-04-2024"]);

    assert_eq!(result.rows[0].debit, "2,000.00");
    assert_eq!(result.rows[0].balance, "48,000.00");
    assert_eq!(result.rows[1].credit, "50,000.00");
    assert_eq!(result.rows[2].reference, "123456");
    assert_eq!(result.rows[3].credit, "20.00");

    assert!(result.diagnostics.is_empty());
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Test 2: a page without a text layer falls back to OCR
// ---------------------------------------------------------------------------
#[test]
fn scanned_page_uses_ocr() {
    let text_layer = MockTextLayer {
        pages: vec![page(&["15-03-24 ATM-CASH WITHDRAWAL 2,000.00 48,000.00"]), vec![]],
    };
    let mut ocr = MockOcr::default();
    ocr.texts.insert(
        2,
        Ok("Branch: Koramangala (BLR)\n20-03-24 INTEREST 12.50\n".to_string()),
    );

    let result = run(&text_layer, &ocr, &ExtractOptions::default()).unwrap();

    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[1].credit, "12.50");
    assert_eq!(result.header.get(HeaderField::Branch), Some("Koramangala"));
}

// ---------------------------------------------------------------------------
// Test 3: force_ocr ignores the text layer on every page
// ---------------------------------------------------------------------------
#[test]
fn force_ocr_bypasses_text_layer() {
    let text_layer = MockTextLayer {
        pages: vec![page(&["15-03-24 FROM TEXT LAYER 1.00"])],
    };
    let mut ocr = MockOcr::default();
    ocr.texts.insert(1, Ok("15-03-24 FROM OCR 2.00".to_string()));

    let options = ExtractOptions {
        force_ocr: true,
        ..Default::default()
    };
    let result = run(&text_layer, &ocr, &options).unwrap();

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].description, "FROM OCR");
}

// ---------------------------------------------------------------------------
// Test 4: an OCR failure skips the page but keeps the rest
// ---------------------------------------------------------------------------
#[test]
fn ocr_failure_is_page_level() {
    let text_layer = MockTextLayer {
        pages: vec![vec![], page(&["15-03-24 ATM-CASH WITHDRAWAL 2,000.00 48,000.00"])],
    };
    let mut ocr = MockOcr::default();
    ocr.texts
        .insert(1, Err(PageError::Ocr("engine crashed".to_string())));

    let result = run(&text_layer, &ocr, &ExtractOptions::default()).unwrap();

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].page_number, 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::OcrFailed);
}

// ---------------------------------------------------------------------------
// Test 5: an undecodable document is a single fatal error
// ---------------------------------------------------------------------------
#[test]
fn undecodable_document_is_fatal() {
    let text_layer = MockTextLayer { pages: vec![] };
    let ocr = MockOcr::default();
    let backends = Backends {
        text_layer: &text_layer,
        renderer: &ocr,
        ocr: &ocr,
    };
    let err = convert_pdf(
        b"garbage",
        &backends,
        &ExtractOptions::default(),
        &CancellationToken::new(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, PassbookError::Decode(_)));
}

// ---------------------------------------------------------------------------
// Test 6: cancellation before start schedules no pages
// ---------------------------------------------------------------------------
#[test]
fn cancelled_conversion_returns_no_rows() {
    let text_layer = MockTextLayer {
        pages: vec![vec![], vec![]],
    };
    let ocr = MockOcr::default();
    let backends = Backends {
        text_layer: &text_layer,
        renderer: &ocr,
        ocr: &ocr,
    };
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = convert_pdf(b"%PDF-1.4", &backends, &ExtractOptions::default(), &cancel, Some(2)).unwrap();

    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    assert!(result.rows.is_empty());
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::Cancelled));
    assert_eq!(result.diagnostics.len(), 2);
}

// ---------------------------------------------------------------------------
// Test 7: multi-line particulars are merged only when enabled
// ---------------------------------------------------------------------------
#[test]
fn multiline_particulars_option() {
    let text_layer = MockTextLayer {
        pages: vec![page(&[
            "01-03-24 UPI/P2M/4411 PAYMENT 100.00 900.00",
            "TO AMAZON SELLER SERVICES",
            "02-03-24 ATM-CASH WITHDRAWAL 200.00 700.00",
        ])],
    };
    let ocr = MockOcr::default();

    let merged = run(&text_layer, &ocr, &ExtractOptions::default()).unwrap();
    assert_eq!(
        merged.rows[0].description,
        "UPI/P2M/4411 PAYMENT TO AMAZON SELLER SERVICES"
    );

    let options = ExtractOptions {
        merge_multiline_particulars: false,
        ..Default::default()
    };
    let single = run(&text_layer, &ocr, &options).unwrap();
    assert_eq!(single.rows[0].description, "UPI/P2M/4411 PAYMENT");
    assert_eq!(single.rows.len(), 2);
}

// ---------------------------------------------------------------------------
// Test 8: cover page with no rows is noted, not failed
// ---------------------------------------------------------------------------
#[test]
fn cover_page_yields_info_diagnostic() {
    let text_layer = MockTextLayer {
        pages: vec![
            page(&["Welcome to Bank of BARODA", "Account Holder: Priya Sharma"]),
            page(&["05-05-24 CASH DEPOSIT 3,000.00"]),
        ],
    };
    let ocr = MockOcr::default();

    let result = run(&text_layer, &ocr, &ExtractOptions::default()).unwrap();

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].credit, "3,000.00");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::NoTransactions);
    assert_eq!(result.header.get(HeaderField::Holder), Some("Priya Sharma"));
    assert_eq!(result.pages_processed, 2);
}
