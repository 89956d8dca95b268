//! Column definitions, rows and the extraction result.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Semantic type of a ledger column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    SerialNo,
    TxDate,
    ValueDate,
    Description,
    Reference,
    Credit,
    Debit,
    Balance,
}

impl ColumnType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnType::SerialNo => "SERIAL_NO",
            ColumnType::TxDate => "TX_DATE",
            ColumnType::ValueDate => "VALUE_DATE",
            ColumnType::Description => "DESCRIPTION",
            ColumnType::Reference => "REFERENCE",
            ColumnType::Credit => "CREDIT",
            ColumnType::Debit => "DEBIT",
            ColumnType::Balance => "BALANCE",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A resolved table column and its horizontal span.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub index: usize,
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(rename = "w")]
    pub width: f64,
    pub multiline: bool,
    pub parse_number: bool,
}

impl ColumnDef {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// A cell value: free text or a coerced number.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// Empty text and zero both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

// Integral amounts serialize as JSON integers (`50000`, not `50000.0`).
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

/// One logical ledger row; only populated columns are present.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<ColumnType, CellValue>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: ColumnType, value: CellValue) {
        self.0.insert(column, value);
    }

    pub fn get(&self, column: ColumnType) -> Option<&CellValue> {
        self.0.get(&column)
    }

    pub fn contains(&self, column: ColumnType) -> bool {
        self.0.contains_key(&column)
    }

    pub fn text(&self, column: ColumnType) -> Option<&str> {
        self.get(column).and_then(CellValue::as_text)
    }

    pub fn number(&self, column: ColumnType) -> Option<f64> {
        self.get(column).and_then(CellValue::as_number)
    }

    /// A ledger row needs a transaction date and a non-zero amount.
    pub fn is_transaction(&self) -> bool {
        let has = |c| self.get(c).is_some_and(|v| !v.is_blank());
        has(ColumnType::TxDate) && (has(ColumnType::Credit) || has(ColumnType::Debit))
    }
}

impl FromIterator<(ColumnType, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (ColumnType, CellValue)>>(iter: I) -> Self {
        Row(iter.into_iter().collect())
    }
}

/// Columns of the first page plus the rows of every page, in page order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtractTableResult {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Row>,
}
