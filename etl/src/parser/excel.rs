//! Workbook reader backed by `calamine`.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use super::{is_na_token, normalize_headers, LoadInfo, ParseResult, SourceFormat};
use crate::error::{LoadError, LoadResult};
use crate::models::{Cell, Column, Table};
use crate::transform::dates::parse_lenient;

/// Load the first worksheet of a workbook. The first row holds the headers.
pub fn load_workbook(path: &Path) -> LoadResult<ParseResult> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptyFile)??;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(LoadError::EmptyFile)?;
    let raw_headers: Vec<String> = header_row.iter().map(header_text).collect();
    if raw_headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoHeaders);
    }
    let headers = normalize_headers(&raw_headers);

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(row.get(i).map(convert_cell).unwrap_or(Cell::Missing));
        }
    }

    let columns = headers
        .iter()
        .cloned()
        .zip(cells)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();
    let table = Table::from_columns(columns).map_err(|e| LoadError::Format(e.to_string()))?;

    let info = LoadInfo {
        path: path.to_path_buf(),
        format: SourceFormat::Excel,
        encoding: None,
        delimiter: None,
        headers,
        row_count: table.row_count(),
    };

    Ok(ParseResult { table, info })
}

fn header_text(data: &Data) -> String {
    match data {
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

/// Map a workbook cell onto a table cell.
pub fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) if is_na_token(s) => Cell::Missing,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::Date(value),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_lenient(s) {
            Some(value) => Cell::Date(value),
            None => Cell::Text(s.clone()),
        },
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Missing,
    }
}
