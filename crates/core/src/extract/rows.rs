//! Reconstruction of logical rows from the lines below a header.
//!
//! A logical row may wrap across several physical lines when its
//! description or reference is long. For every starting line the widest
//! window (up to `lookahead_lines` extra lines) whose bucketing stays
//! consistent is accepted, so a wrapped row is captured whole instead of
//! as several partial rows.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::model::{CellValue, ColumnDef, Row, TextFragment};
use crate::settings::ExtractSettings;

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").unwrap());
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*\.?[0-9]*").unwrap());

/// Fragments collected per column, indexed like the column slice.
type Buckets<'a> = Vec<Vec<&'a TextFragment>>;

/// Build rows from `lines` (top to bottom) using `columns`.
///
/// Only rows carrying a transaction date and a credit or debit amount
/// are returned.
pub fn extract_rows(
    lines: &[&[TextFragment]],
    columns: &[ColumnDef],
    settings: &ExtractSettings,
) -> Vec<Row> {
    let mut rows = Vec::new();
    if columns.is_empty() {
        return rows;
    }

    let mut i = 0;
    while i < lines.len() {
        let last = (i + settings.lookahead_lines).min(lines.len() - 1);
        let mut next = i + 1;
        for j in (i..=last).rev() {
            let buckets = fill_buckets(&lines[i..=j], columns);
            if !buckets_are_consistent(&buckets, columns, settings.row_y_tolerance) {
                continue;
            }

            let row = build_row(&buckets, columns);
            if row.is_transaction() {
                rows.push(row);
            } else {
                trace!(first_line = i, last_line = j, "dropped non-transaction row");
            }
            next = j + 1;
            break;
        }
        i = next;
    }

    rows
}

/// Whether the horizontal spans `[t1, t2]` and `[b1, b2]` overlap,
/// counting a fragment that merely touches a column's left edge.
pub(crate) fn spans_overlap(t1: f64, t2: f64, b1: f64, b2: f64) -> bool {
    (t1 <= b1 && t2 >= b1 && t2 <= b2)
        || (t1 >= b1 && t1 < b2 && t2 >= b2)
        || (t1 <= b1 && t2 >= b2)
        || (t1 >= b1 && t2 <= b2)
}

/// Column receiving `fragment`: the one with the largest horizontal
/// overlap, the earliest on ties.
pub(crate) fn best_column(fragment: &TextFragment, columns: &[ColumnDef]) -> Option<usize> {
    let (t1, t2) = (fragment.x, fragment.right());
    let mut best: Option<(usize, f64)> = None;
    for (idx, column) in columns.iter().enumerate() {
        let (b1, b2) = (column.x, column.right());
        if !spans_overlap(t1, t2, b1, b2) {
            continue;
        }
        let overlap = b2.min(t2) - b1.max(t1);
        if best.is_none_or(|(_, current)| overlap > current) {
            best = Some((idx, overlap));
        }
    }
    best.map(|(idx, _)| idx)
}

fn fill_buckets<'a>(window: &[&'a [TextFragment]], columns: &[ColumnDef]) -> Buckets<'a> {
    let mut buckets: Buckets<'a> = vec![Vec::new(); columns.len()];
    for fragment in window.iter().flat_map(|line| line.iter()) {
        match best_column(fragment, columns) {
            Some(idx) => buckets[idx].push(fragment),
            None => trace!(text = %fragment.text(), x = fragment.x, "fragment outside every column"),
        }
    }
    buckets
}

// Single-line columns must not collect fragments from different lines.
fn buckets_are_consistent(buckets: &Buckets<'_>, columns: &[ColumnDef], tolerance: f64) -> bool {
    buckets.iter().zip(columns).all(|(bucket, column)| {
        if column.multiline || bucket.len() <= 1 {
            return true;
        }
        let (lo, hi) = bucket
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), f| (lo.min(f.y), hi.max(f.y)));
        hi - lo <= tolerance
    })
}

fn build_row(buckets: &Buckets<'_>, columns: &[ColumnDef]) -> Row {
    buckets
        .iter()
        .zip(columns)
        .filter(|(bucket, _)| !bucket.is_empty())
        .map(|(bucket, column)| {
            let text = bucket.iter().map(|f| f.text()).join(" ");
            let value = if column.parse_number {
                CellValue::Number(coerce_number(&text))
            } else {
                CellValue::Text(text)
            };
            (column.column_type, value)
        })
        .collect()
}

/// Lenient amount parsing: everything but digits and dots is dropped and
/// the longest leading decimal is read. Never fails; garbage is `0`.
pub fn coerce_number(raw: &str) -> f64 {
    let cleaned = NON_NUMERIC.replace_all(raw, "");
    NUMERIC_PREFIX
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}
