//! Page orchestration: per-page extraction and cross-page assembly.

use tracing::{debug, error, info, info_span};

use super::columns::identify_columns;
use super::lines::LineMap;
use super::rows::extract_rows;
use crate::error::{ExtractError, Result};
use crate::model::{ColumnDef, ExtractTableResult, Row, TextFragment};
use crate::settings::ExtractSettings;
use crate::source::{DocumentEvent, Page};

/// Where a page's columns came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnSource {
    /// Classified from the page's own header line.
    Own,
    /// Carried over from an earlier page.
    Inherited,
    /// No header and nothing to inherit; the page yields no rows.
    Missing,
}

/// Extraction outcome of a single page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageTable {
    /// One-based position in the document.
    pub page_number: usize,
    pub header_y: Option<f64>,
    pub source: ColumnSource,
    /// Columns the rows were bucketed with.
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Row>,
}

/// Extract the table of one page.
///
/// `fallback` is used verbatim when the page has no header of its own.
pub fn extract_page_table(
    fragments: &[TextFragment],
    fallback: Option<&[ColumnDef]>,
    page_number: usize,
    settings: &ExtractSettings,
) -> PageTable {
    let lines = LineMap::group(fragments, settings);

    let table = match identify_columns(&lines, settings) {
        Some(found) => {
            let body = lines.lines_after(Some(found.body_after));
            let rows = extract_rows(&body, &found.columns, settings);
            PageTable {
                page_number,
                header_y: Some(found.header_y),
                source: ColumnSource::Own,
                columns: found.columns,
                rows,
            }
        }
        None => {
            let (columns, source) = match fallback {
                Some(columns) => (columns.to_vec(), ColumnSource::Inherited),
                None => (Vec::new(), ColumnSource::Missing),
            };
            let rows = extract_rows(&lines.lines_after(None), &columns, settings);
            PageTable {
                page_number,
                header_y: None,
                source,
                columns,
                rows,
            }
        }
    };

    debug!(
        page = page_number,
        lines = lines.len(),
        header_y = ?table.header_y,
        source = ?table.source,
        columns = table.columns.len(),
        rows = table.rows.len(),
        "page extracted"
    );
    table
}

/// Incremental document extraction, one page at a time.
///
/// Pages must be pushed in document order. The first page that
/// classifies its own header provides the columns for later pages
/// without one.
#[derive(Debug, Default)]
pub struct TableExtractor {
    settings: ExtractSettings,
    pages: Vec<PageTable>,
    fallback: Option<Vec<ColumnDef>>,
}

impl TableExtractor {
    pub fn new(settings: ExtractSettings) -> Self {
        Self {
            settings,
            pages: Vec::new(),
            fallback: None,
        }
    }

    pub fn push_page(&mut self, page: &Page) -> &PageTable {
        let table = extract_page_table(
            &page.texts,
            self.fallback.as_deref(),
            self.pages.len() + 1,
            &self.settings,
        );
        if self.fallback.is_none() && table.source == ColumnSource::Own {
            self.fallback = Some(table.columns.clone());
        }
        self.pages.push(table);
        &self.pages[self.pages.len() - 1]
    }

    /// Assemble the document result.
    ///
    /// Columns are always page 1's, empty when page 1 had no header. Rows
    /// are concatenated in page order.
    pub fn finish(self) -> Result<ExtractTableResult> {
        let Some(first) = self.pages.first() else {
            error!("No pages found");
            return Err(ExtractError::NoPagesFound);
        };
        info!(total_pages = self.pages.len(), "All pages parsed");

        let columns = first.columns.clone();
        let rows = self.pages.into_iter().flat_map(|p| p.rows).collect();
        Ok(ExtractTableResult { columns, rows })
    }
}

/// Run a whole extraction over ordered document events.
///
/// Stops at `End` (or when the events run out) and fails on the first
/// decoder `Failure`.
pub fn extract_table<I>(events: I, settings: &ExtractSettings) -> Result<ExtractTableResult>
where
    I: IntoIterator<Item = DocumentEvent>,
{
    let mut extractor = TableExtractor::new(settings.clone());
    for event in events {
        match event {
            DocumentEvent::Metadata(meta) => info!(pdf_meta = %meta, "PDF Metadata"),
            DocumentEvent::Page(page) => {
                extractor.push_page(&page);
            }
            DocumentEvent::End => break,
            DocumentEvent::Failure(message) => {
                error!(error = %message, "Parser Error");
                return Err(ExtractError::Decoder(message));
            }
        }
    }
    extractor.finish()
}

/// [`extract_table`] inside an `extract` span tagged with `job_id`.
pub fn extract_table_for_job<I>(
    job_id: &str,
    events: I,
    settings: &ExtractSettings,
) -> Result<ExtractTableResult>
where
    I: IntoIterator<Item = DocumentEvent>,
{
    let span = info_span!("extract", job_id = job_id);
    let _guard = span.enter();
    extract_table(events, settings)
}
