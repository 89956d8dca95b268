//! Rendering of an extraction result as JSON or CSV.

use itertools::Itertools;

use crate::error::Result;
use crate::model::{CellValue, ExtractTableResult};

/// Output document format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// CSV dialect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvStyle {
    /// Bare comma join with no quoting. Blank cells (missing, empty or
    /// zero) render as nothing. Values containing commas shift columns.
    #[default]
    Plain,
    /// RFC 4180 quoting; zero renders as `0`.
    Quoted,
}

pub fn render(result: &ExtractTableResult, format: OutputFormat, style: CsvStyle) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Csv => to_csv(result, style),
    }
}

/// Pretty-printed JSON of columns and rows.
pub fn to_json(result: &ExtractTableResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn to_csv(result: &ExtractTableResult, style: CsvStyle) -> Result<String> {
    match style {
        CsvStyle::Plain => Ok(plain_csv(result)),
        CsvStyle::Quoted => quoted_csv(result),
    }
}

fn plain_csv(result: &ExtractTableResult) -> String {
    let header = result.columns.iter().map(|c| c.label.as_str()).join(",");
    let rows = result.rows.iter().map(|row| {
        result
            .columns
            .iter()
            .map(|c| match row.get(c.column_type) {
                Some(value) if !value.is_blank() => value.to_string(),
                _ => String::new(),
            })
            .join(",")
    });
    std::iter::once(header).chain(rows).join("\n")
}

fn quoted_csv(result: &ExtractTableResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(result.columns.iter().map(|c| c.label.as_str()))?;
    for row in &result.rows {
        writer.write_record(
            result
                .columns
                .iter()
                .map(|c| row.get(c.column_type).map(CellValue::to_string).unwrap_or_default()),
        )?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
