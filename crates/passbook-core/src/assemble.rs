use std::collections::BTreeMap;

use crate::diagnostics::PageDiagnostic;
use crate::model::{ColumnTemplate, ExtractionResult, HeaderFields, TransactionRow};
use crate::parsing::ParsedPage;

/// What one page worker hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Parsed { page_number: usize, page: ParsedPage },
    Failed { page_number: usize, diagnostic: PageDiagnostic },
    Cancelled { page_number: usize },
}

impl PageOutcome {
    pub fn page_number(&self) -> usize {
        match self {
            PageOutcome::Parsed { page_number, .. }
            | PageOutcome::Failed { page_number, .. }
            | PageOutcome::Cancelled { page_number } => *page_number,
        }
    }
}

/// Per-document merge state.
///
/// Outcomes may arrive in any order; `finish` replays them by page number so
/// the header merge, template lock and row order never depend on scheduling.
#[derive(Debug, Default)]
pub struct TableAssembler {
    pending: BTreeMap<usize, PageOutcome>,
}

impl TableAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, outcome: PageOutcome) {
        let page_number = outcome.page_number();
        if self.pending.insert(page_number, outcome).is_some() {
            tracing::warn!(page_number, "duplicate outcome for page, keeping the latest");
        }
    }

    pub fn finish(self) -> ExtractionResult {
        let mut state = AssemblyState::default();
        for (_, outcome) in self.pending {
            state.apply(outcome);
        }
        state.into_result()
    }
}

#[derive(Debug, Default)]
struct AssemblyState {
    header: HeaderFields,
    template: Option<ColumnTemplate>,
    template_page: Option<usize>,
    rows: Vec<TransactionRow>,
    diagnostics: Vec<PageDiagnostic>,
    pages_processed: usize,
}

impl AssemblyState {
    fn apply(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Parsed { page_number, page } => {
                self.pages_processed += 1;
                self.header.merge_from(&page.header);

                if page.rows.is_empty() {
                    self.diagnostics
                        .push(PageDiagnostic::no_transactions(page_number, page.line_count));
                    return;
                }

                if self.template.is_none() {
                    self.template = Some(ColumnTemplate::default());
                    self.template_page = Some(page_number);
                    tracing::debug!(page_number, "column template locked");
                }
                self.rows.extend(page.rows);
            }
            PageOutcome::Failed { diagnostic, .. } => {
                self.pages_processed += 1;
                self.diagnostics.push(diagnostic);
            }
            PageOutcome::Cancelled { page_number } => {
                self.diagnostics.push(PageDiagnostic::cancelled(page_number));
            }
        }
    }

    fn into_result(self) -> ExtractionResult {
        if let Some(page) = self.template_page {
            tracing::info!(
                rows = self.rows.len(),
                template_page = page,
                "document assembled"
            );
        }
        ExtractionResult {
            header: self.header,
            columns: self.template.unwrap_or_default(),
            rows: self.rows,
            diagnostics: self.diagnostics,
            pages_processed: self.pages_processed,
        }
    }
}
