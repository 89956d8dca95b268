//! Bank-statement column vocabulary.
//!
//! Every column type owns a list of keywords. Keywords match
//! case-insensitively and only as whole words, so "update" never
//! mentions "date". Declaration order is significant: when a label
//! mentions several types, the earliest entry wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ColumnType;

/// Keywords and flags for one column type.
#[derive(Debug)]
pub struct ColumnKeywords {
    pub column_type: ColumnType,
    pub keywords: &'static [&'static str],
    pub multiline: bool,
    pub parse_number: bool,
}

pub static COLUMN_KEYWORDS: [ColumnKeywords; 8] = [
    ColumnKeywords {
        column_type: ColumnType::SerialNo,
        keywords: &["sn", "sl", "s no"],
        multiline: false,
        parse_number: false,
    },
    ColumnKeywords {
        column_type: ColumnType::ValueDate,
        keywords: &["value date", "value dt"],
        multiline: false,
        parse_number: false,
    },
    ColumnKeywords {
        column_type: ColumnType::TxDate,
        keywords: &["date", "transaction date"],
        multiline: false,
        parse_number: false,
    },
    ColumnKeywords {
        column_type: ColumnType::Description,
        keywords: &["remarks", "description", "notes", "particulars", "narration"],
        multiline: true,
        parse_number: false,
    },
    ColumnKeywords {
        column_type: ColumnType::Reference,
        keywords: &["cheque", "ref no", "tran. no", "transaction no", "chq", "ref.no"],
        multiline: true,
        parse_number: false,
    },
    ColumnKeywords {
        column_type: ColumnType::Credit,
        keywords: &["credit", "deposit", "in"],
        multiline: false,
        parse_number: true,
    },
    ColumnKeywords {
        column_type: ColumnType::Debit,
        keywords: &["debit", "withdrawal", "out"],
        multiline: false,
        parse_number: true,
    },
    ColumnKeywords {
        column_type: ColumnType::Balance,
        keywords: &["balance", "closing balance"],
        multiline: false,
        parse_number: true,
    },
];

// Each entry paired with its compiled alternation, in declaration order.
static MATCHERS: Lazy<Vec<(&'static ColumnKeywords, Regex)>> = Lazy::new(|| {
    COLUMN_KEYWORDS
        .iter()
        .map(|entry| {
            let alternation = entry
                .keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            let re = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap();
            (entry, re)
        })
        .collect()
});

/// Number of distinct column types mentioned in `text`.
pub fn count_mentioned_types(text: &str) -> usize {
    MATCHERS.iter().filter(|(_, re)| re.is_match(text)).count()
}

/// First entry, in declaration order, that is not yet taken and whose
/// keywords appear in `label`.
pub fn classify_label(label: &str, taken: &[ColumnType]) -> Option<&'static ColumnKeywords> {
    MATCHERS
        .iter()
        .filter(|(entry, _)| !taken.contains(&entry.column_type))
        .find(|(_, re)| re.is_match(label))
        .map(|(entry, _)| *entry)
}

/// Taxonomy entry for a column type.
pub fn keywords_for(column_type: ColumnType) -> &'static ColumnKeywords {
    let idx = match column_type {
        ColumnType::SerialNo => 0,
        ColumnType::ValueDate => 1,
        ColumnType::TxDate => 2,
        ColumnType::Description => 3,
        ColumnType::Reference => 4,
        ColumnType::Credit => 5,
        ColumnType::Debit => 6,
        ColumnType::Balance => 7,
    };
    &COLUMN_KEYWORDS[idx]
}
