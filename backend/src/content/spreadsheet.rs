//! Spreadsheet uploads turned into [`TableData`]: first row is the header, every
//! following non-blank row is a body row.

use crate::content::{PlaceholderValue, TableData};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx, XlsxError};
use chrono::NaiveTime;
use std::error::Error;
use std::io::Cursor;

type ParseResult = Result<PlaceholderValue, Box<dyn Error + Send + Sync>>;

/// First worksheet of an `.xlsx` workbook.
pub fn parse_xlsx(bytes: &[u8]) -> ParseResult {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).map_err(|e: XlsxError| e.to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or("workbook has no worksheets")?
        .map_err(|e: XlsxError| e.to_string())?;
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(PlaceholderValue::Table(table_from_rows(rows)?))
}

/// A delimited text file; the delimiter is whichever of `,` `;` tab `|` appears most
/// in the header line, comma on a tie.
pub fn parse_csv(bytes: &[u8]) -> ParseResult {
    let header_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let header_line = String::from_utf8_lossy(header_line);
    let delimiter = detect_delimiter(&header_line);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }
    Ok(PlaceholderValue::Table(table_from_rows(rows)?))
}

fn detect_delimiter(header_line: &str) -> u8 {
    [b',', b';', b'\t', b'|']
        .into_iter()
        .rev()
        .max_by_key(|&d| header_line.matches(d as char).count())
        .unwrap_or(b',')
}

/// Display text of a cell. Date-formatted cells read as `YYYY-MM-DD`, with the time
/// appended when it is not midnight.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::DateTime(value) => match value.as_datetime() {
            Some(at) if at.time() == NaiveTime::MIN => at.format("%Y-%m-%d").to_string(),
            Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// Header plus body rows. Short rows are padded; rows wider than the header add
/// `Column N` columns, so no cell is dropped.
fn table_from_rows(rows: Vec<Vec<String>>) -> Result<TableData, &'static str> {
    let mut rows: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();
    if rows.is_empty() {
        return Err("spreadsheet is empty");
    }
    let header = rows.remove(0);
    let width = rows.iter().map(Vec::len).fold(header.len(), usize::max);

    let mut columns: Vec<String> = header.into_iter().map(|name| name.trim().to_string()).collect();
    columns.resize(width, String::new());
    for (i, name) in columns.iter_mut().enumerate() {
        if name.is_empty() {
            *name = format!("Column {}", i + 1);
        }
    }
    for row in &mut rows {
        row.resize(width, String::new());
    }
    Ok(TableData { columns, rows })
}
