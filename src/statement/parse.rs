use crate::util::basic::SError;

use super::columns::{
    cash_column_boundaries, interest_column_boundaries, CashColumns,
    InterestColumns,
};
use super::fragment::TextFragment;
use super::headers::{find_cash_headers, find_interest_headers};
use super::model::StatementTransactions;
use super::rows::{cash_rows, interest_rows};
use super::sections::{
    scan_markers, SectionState, CASH_END_MARKERS, CASH_START_MARKERS,
    INTEREST_END_MARKERS, INTEREST_START_MARKERS,
};

/// Points from the page bottom treated as repeating footer boilerplate and
/// dropped before any other processing. Tuned against the known statement
/// template family; calibrate per template via ParseOptions.
pub const DEFAULT_FOOTER_BAND: f64 = 120.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ParseOptions {
    pub footer_band: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { footer_band: DEFAULT_FOOTER_BAND }
    }
}

/// Receives progress notifications from the parse driver. Implementations
/// must not block; they cannot alter parse state.
pub trait ParseObserver {
    fn on_status(&mut self, _msg: &str) {}
    fn on_progress(&mut self, _current: u32, _total: u32) {}
}

pub struct NoopObserver;
impl ParseObserver for NoopObserver {}

/// Supplies positioned fragments per page. Pages are requested strictly in
/// order, one at a time: the parser's column boundaries and section flags
/// accumulate across pages, so a later page is only meaningful once all
/// earlier pages were processed.
pub trait PageSource {
    fn page_count(&self) -> u32;

    /// page_num is one-based.
    fn page_fragments(&mut self, page_num: u32)
        -> Result<Vec<TextFragment>, SError>;
}

/// A PageSource over pages already held in memory (pre-extracted PDFs,
/// fragment dumps, test fixtures).
pub struct ExtractedPages {
    pages: Vec<Vec<TextFragment>>,
}

impl ExtractedPages {
    pub fn new(pages: Vec<Vec<TextFragment>>) -> Self {
        ExtractedPages { pages }
    }
}

impl PageSource for ExtractedPages {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_fragments(
        &mut self,
        page_num: u32,
    ) -> Result<Vec<TextFragment>, SError> {
        (page_num as usize)
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .cloned()
            .ok_or_else(|| format!("No such page: {page_num}"))
    }
}

/// All state the parser carries from one page to the next. Owned by a
/// single parse run; concurrent runs must each use their own instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParserState {
    pub cash_columns: Option<CashColumns>,
    pub interest_columns: Option<InterestColumns>,
    pub sections: SectionState,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one page's (footer-clipped) fragments, appending extracted
    /// rows and updating the cross-page state.
    pub fn process_page(
        &mut self,
        items: &[TextFragment],
        out: &mut StatementTransactions,
    ) {
        // Cash section
        let markers =
            scan_markers(items, CASH_START_MARKERS, CASH_END_MARKERS);
        let should_process = markers.should_process(self.sections.in_cash);
        if should_process {
            let section_items = markers.crop(items);
            if let Some(headers) = find_cash_headers(&section_items) {
                let cols = cash_column_boundaries(&headers);
                tracing::debug!("new cash column boundaries: {cols:?}");
                self.cash_columns = Some(cols);
            }
            if let Some(cols) = &self.cash_columns {
                let rows = cash_rows(&section_items, cols);
                tracing::debug!("extracted {} cash rows", rows.len());
                out.cash.extend(rows);
            }
        }
        self.sections.in_cash = markers.next_inside(should_process);

        // Interest section
        let markers =
            scan_markers(items, INTEREST_START_MARKERS, INTEREST_END_MARKERS);
        let should_process = markers.should_process(self.sections.in_interest);
        if should_process {
            let section_items = markers.crop(items);
            if let Some(headers) = find_interest_headers(&section_items) {
                let cols = interest_column_boundaries(&headers);
                tracing::debug!("new interest column boundaries: {cols:?}");
                self.interest_columns = Some(cols);
            } else if self.interest_columns.is_some() {
                tracing::debug!(
                    "no interest header on this page; keeping prior boundaries"
                );
            }
            if let Some(cols) = &self.interest_columns {
                let rows = interest_rows(&section_items, cols);
                tracing::debug!("extracted {} interest rows", rows.len());
                out.interest.extend(rows);
            }
        }
        self.sections.in_interest = markers.next_inside(should_process);
    }
}

/// Parses a whole statement, page by page, strictly in order.
///
/// The footer band is removed from every page up front, so repeating
/// footer boilerplate can neither trigger section markers nor pollute rows.
/// The observer is told about each page as it completes.
pub fn parse_statement(
    source: &mut dyn PageSource,
    options: &ParseOptions,
    observer: &mut dyn ParseObserver,
) -> Result<StatementTransactions, SError> {
    let total = source.page_count();
    let mut state = ParserState::new();
    let mut out = StatementTransactions::default();

    for page_num in 1..=total {
        observer.on_status(&format!("Processing page {page_num} of {total}"));

        let page_items = source.page_fragments(page_num)?;
        let items: Vec<TextFragment> = page_items
            .into_iter()
            .filter(|it| it.y > options.footer_band)
            .collect();
        tracing::debug!(
            "page {page_num}: {} fragments after footer clipping",
            items.len()
        );

        state.process_page(&items, &mut out);
        observer.on_progress(page_num, total);
    }

    tracing::info!(
        "parsed {} cash and {} interest transactions",
        out.cash.len(),
        out.interest.len()
    );
    Ok(out)
}

// MARK: tests
