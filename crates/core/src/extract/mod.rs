//! The extraction pipeline: lines, header, columns, rows, pages.

pub mod columns;
pub mod header;
pub mod lines;
pub mod page;
pub mod rows;

pub use columns::{HeaderColumns, identify_columns, redistribute_widths};
pub use header::find_header_y;
pub use lines::{LineMap, canonical_y};
pub use page::{
    ColumnSource, PageTable, TableExtractor, extract_page_table, extract_table,
    extract_table_for_job,
};
pub use rows::{coerce_number, extract_rows};
