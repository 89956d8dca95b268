//! ledgerscan - ledger table extraction from positioned PDF text.
//!
//! The PDF decoder is external: it supplies each page as a flat list of
//! positioned, styled text fragments. From those this crate recovers the
//! transaction table of a bank statement:
//!
//! 1. fragments are grouped into visual lines ([`extract::lines`]),
//! 2. the header line is found by keyword matching ([`extract::header`]),
//! 3. header fragments become typed columns ([`extract::columns`]),
//! 4. the lines below are bucketed into rows ([`extract::rows`]),
//! 5. pages are assembled into one table ([`extract::page`]).
//!
//! # Example
//!
//! ```ignore
//! use ledgerscan_core::source::Pdf2JsonDocument;
//! use ledgerscan_core::{ExtractSettings, extract_table};
//!
//! let doc = Pdf2JsonDocument::from_slice(&std::fs::read("statement.json")?)?;
//! let table = extract_table(doc.into_events(), &ExtractSettings::default())?;
//! ```

pub mod error;
pub mod extract;
pub mod model;
pub mod output;
pub mod settings;
pub mod source;
pub mod taxonomy;

pub use error::{ExtractError, Result};
pub use extract::{TableExtractor, extract_table, extract_table_for_job};
pub use model::{CellValue, ColumnDef, ColumnType, ExtractTableResult, Row};
pub use settings::ExtractSettings;
