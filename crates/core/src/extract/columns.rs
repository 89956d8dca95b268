//! Column definitions from a detected header line.

use itertools::Itertools;
use tracing::trace;

use super::header::find_header_y;
use super::lines::LineMap;
use crate::model::{ColumnDef, ColumnType, TextFragment};
use crate::settings::ExtractSettings;
use crate::taxonomy::classify_label;

/// Columns resolved from a page's own header.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderColumns {
    /// Canonical y of the header line.
    pub header_y: f64,
    /// Last line belonging to the header; equals `header_y` unless a
    /// wrapped second header line was merged in.
    pub body_after: f64,
    pub columns: Vec<ColumnDef>,
}

/// Locate the header line and turn its fragments into typed columns.
///
/// Returns `None` when no line qualifies as a header.
pub fn identify_columns(lines: &LineMap, settings: &ExtractSettings) -> Option<HeaderColumns> {
    let header_y = find_header_y(lines, settings)?;
    let header = lines.get(header_y).filter(|texts| !texts.is_empty())?;

    // Working copy of the following line; matched continuations are
    // removed by position so each can be used once.
    let second_y = lines.next_key_after(header_y);
    let mut second: Vec<TextFragment> = second_y
        .and_then(|y| lines.get(y))
        .map(<[TextFragment]>::to_vec)
        .unwrap_or_default();
    let mut merged_second = false;

    let mut taken: Vec<ColumnType> = Vec::new();
    let mut columns: Vec<ColumnDef> = Vec::new();
    for (index, text) in header.iter().sorted_by(|a, b| a.x.total_cmp(&b.x)).enumerate() {
        let mut label = text.text();
        if let Some(pos) = second
            .iter()
            .position(|candidate| is_continuation(text, candidate, settings))
        {
            let continuation = second.remove(pos);
            label.push(' ');
            label.push_str(&continuation.text());
            merged_second = true;
        }

        let Some(entry) = classify_label(&label, &taken) else {
            trace!(label = %label, x = text.x, "unclassified header fragment");
            continue;
        };

        taken.push(entry.column_type);
        columns.push(ColumnDef {
            column_type: entry.column_type,
            index,
            label,
            x: text.x,
            y: text.y,
            width: text.width,
            multiline: entry.multiline,
            parse_number: entry.parse_number,
        });
    }

    redistribute_widths(&mut columns, settings.multiline_share);

    let body_after = match second_y {
        Some(y) if merged_second => y,
        _ => header_y,
    };
    Some(HeaderColumns {
        header_y,
        body_after,
        columns,
    })
}

/// Whether `candidate` on the next line continues the wrapped header
/// label `header`.
pub(crate) fn is_continuation(
    header: &TextFragment,
    candidate: &TextFragment,
    settings: &ExtractSettings,
) -> bool {
    if candidate.x > header.right() || candidate.x < header.x {
        return false;
    }
    if !candidate.same_appearance(header) {
        return false;
    }
    let [run] = candidate.runs.as_slice() else {
        return false;
    };
    let Some(header_run) = header.runs.first() else {
        return false;
    };
    if run.style_index != header_run.style_index || run.style != header_run.style {
        return false;
    }
    candidate.right() - header.right() <= settings.continuation_slack
}

/// Re-split adjacent column spans so they tile without gaps.
///
/// Pairs are processed left to right, each pair seeing the previous
/// pair's result. A multiline column paired with a single-line one gets
/// `multiline_share` percent of the pair's span; like pairs split evenly.
/// Shares above 100 are treated as 100.
pub fn redistribute_widths(columns: &mut [ColumnDef], multiline_share: u32) {
    let multiline_share = multiline_share.min(100);
    for i in 1..columns.len() {
        let (head, tail) = columns.split_at_mut(i);
        let left = &mut head[i - 1];
        let right = &mut tail[0];

        let share = |col: &ColumnDef| {
            if col.multiline {
                multiline_share
            } else {
                100 - multiline_share
            }
        };
        let mut left_share = share(left);
        if left_share + share(right) != 100 {
            left_share = 50;
        }

        let total = right.right() - left.x;
        let left_width = (total * f64::from(left_share) / 100.0).round();
        left.width = left_width;
        right.x = left.x + left_width;
        right.width = total - left_width;
    }
}
