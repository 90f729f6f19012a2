//! Input loader: CSV or Excel into a typed [`Table`].
//!
//! CSV input goes through encoding and delimiter auto-detection before the
//! `csv` reader runs. Workbooks are read with `calamine` (first sheet only).
//! Either way the first row is the header.

pub mod excel;

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};
use crate::models::{Cell, Column, Table};

/// Strings read as missing.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Extensions routed to the workbook reader.
const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Kind of file a table was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Excel,
}

/// Metadata about a load
#[derive(Debug, Clone, Serialize)]
pub struct LoadInfo {
    pub path: PathBuf,
    pub format: SourceFormat,
    /// Detected encoding (CSV only)
    pub encoding: Option<String>,
    /// Detected delimiter (CSV only)
    pub delimiter: Option<char>,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: Table,
    pub info: LoadInfo,
}

/// Load a table, picking the reader from the file extension.
pub fn load_table<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    match source_format(path) {
        SourceFormat::Excel => excel::load_workbook(path),
        SourceFormat::Csv => parse_csv_file_auto(path),
    }
}

/// Decide the reader for a path.
pub fn source_format(path: &Path) -> SourceFormat {
    let is_excel = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| EXCEL_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);

    if is_excel {
        SourceFormat::Excel
    } else {
        SourceFormat::Csv
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => s,
            Err(_) => String::from_utf8_lossy(bytes).to_string(),
        },
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()
        }
        label => encoding_rs::Encoding::for_label(label.as_bytes())
            .map(|enc| enc.decode(bytes).0.to_string())
            .ok_or_else(|| LoadError::Encoding(format!("unsupported encoding '{}'", label)))?,
    };

    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting unquoted occurrences in the first line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let mut in_quotes = false;
        let count = first_line
            .chars()
            .filter(|&c| {
                if c == '"' {
                    in_quotes = !in_quotes;
                }
                c == sep && !in_quotes
            })
            .count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let mut result = parse_bytes_auto(&bytes)?;
    result.info.path = path.to_path_buf();
    Ok(result)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<ParseResult> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(LoadError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    let table = parse_csv_str(&content, delimiter)?;
    let info = LoadInfo {
        path: PathBuf::new(),
        format: SourceFormat::Csv,
        encoding: Some(encoding),
        delimiter: Some(delimiter),
        headers: table.column_names(),
        row_count: table.row_count(),
    };

    Ok(ParseResult { table, info })
}

/// Parse CSV text with an explicit delimiter.
///
/// Ragged rows are padded with missing cells or truncated to the header width.
pub fn parse_csv_str(content: &str, delimiter: char) -> LoadResult<Table> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }
    if !delimiter.is_ascii() {
        return Err(LoadError::Format(format!("delimiter '{}' is not ASCII", delimiter)));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if raw_headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoHeaders);
    }
    let headers = normalize_headers(&raw_headers);

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (idx, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based lines
        let record = result.map_err(|e| LoadError::Format(format!("record {}: {}", idx + 2, e)))?;
        for (i, column) in raw_columns.iter_mut().enumerate() {
            column.push(record.get(i).unwrap_or("").to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| Column::new(name, infer_cells(raw)))
        .collect();

    Table::from_columns(columns).map_err(|e| LoadError::Format(e.to_string()))
}

/// Name empty headers and disambiguate duplicates.
///
/// Header text is kept as written, surrounding whitespace included. Empty
/// headers become `Unnamed: {index}`; repeats get `.1`, `.2`, ...
pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h.clone()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

pub(crate) fn is_na_token(value: &str) -> bool {
    NA_TOKENS.contains(&value)
}

/// Type a column of raw strings.
///
/// A column is numeric when every non-missing value parses as a float;
/// otherwise all non-missing values stay text, untrimmed.
fn infer_cells(raw: Vec<String>) -> Vec<Cell> {
    let numeric = raw
        .iter()
        .filter(|v| !is_na_token(v))
        .all(|v| v.trim().parse::<f64>().is_ok());

    raw.into_iter()
        .map(|v| {
            if is_na_token(&v) {
                Cell::Missing
            } else if numeric {
                v.trim().parse::<f64>().map(Cell::Number).unwrap_or(Cell::Missing)
            } else {
                Cell::Text(v)
            }
        })
        .collect()
}
