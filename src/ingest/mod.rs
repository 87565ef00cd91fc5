//! Raw record ingestion: uploaded spreadsheet bytes to an in-memory table.
//!
//! Only `.xlsx` and `.xls` uploads are accepted. The first worksheet is read
//! with its first row as the header; fully empty rows are skipped. No
//! cleaning happens here, cells are carried as loosely-typed [`RawCell`]s
//! for the pipeline to coerce.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use tracing::debug;

use crate::error::IngestError;

/// A single uncoerced spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

/// An uploaded table as parsed: header names plus a grid of raw cells.
///
/// Raw tables are transient; they exist only between upload and the
/// normalization pass.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

/// Check that a filename carries one of the two accepted extensions.
///
/// # Errors
/// Returns [`IngestError::UnsupportedExtension`] otherwise.
pub fn validate_extension(filename: &str) -> std::result::Result<(), IngestError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xls" => Ok(()),
        _ => Err(IngestError::UnsupportedExtension { extension }),
    }
}

/// Parse uploaded workbook bytes into a [`RawTable`].
///
/// # Errors
/// Returns an error when the bytes are not a readable workbook or the
/// workbook has no sheets. An empty first sheet yields an empty table.
pub fn parse_workbook(bytes: &[u8]) -> std::result::Result<RawTable, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptySheet)?
        .map_err(|e| IngestError::Workbook(e.to_string()))?;

    let mut cell_rows = range.rows();
    let headers: Vec<String> = match cell_rows.next() {
        Some(header_row) => header_row.iter().map(header_to_string).collect(),
        None => return Ok(RawTable::default()),
    };

    let mut rows = Vec::new();
    for cell_row in cell_rows {
        let row: Vec<RawCell> = cell_row.iter().map(convert_cell).collect();
        if row.iter().all(|c| *c == RawCell::Empty) {
            continue;
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), columns = headers.len(), "parsed workbook");
    Ok(RawTable { headers, rows })
}

fn header_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) if s.trim().is_empty() => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => RawCell::Date(naive.date()),
            None => RawCell::Empty,
        },
        Data::DateTimeIso(s) => match NaiveDate::parse_from_str(&s[..s.len().min(10)], "%Y-%m-%d")
        {
            Ok(date) => RawCell::Date(date),
            Err(_) => RawCell::Text(s.clone()),
        },
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) => RawCell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_excel_extensions() {
        assert!(validate_extension("vendas_2024.xlsx").is_ok());
        assert!(validate_extension("VENDAS.XLS").is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["demand.csv", "demand.parquet", "demand", "demand.xlsx.zip"] {
            assert!(validate_extension(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn parse_rejects_garbage_bytes() {
        let result = parse_workbook(b"definitely not a workbook");
        assert!(matches!(result, Err(IngestError::Workbook(_))));
    }
}
