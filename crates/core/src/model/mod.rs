//! Core data types shared across the extraction pipeline.

pub mod fragment;
pub mod table;

pub use fragment::{Alignment, StyleDescriptor, TextFragment, TextRun};
pub use table::{CellValue, ColumnDef, ColumnType, ExtractTableResult, Row};
