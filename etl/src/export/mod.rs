//! CSV exporter for the cleaned table.
//!
//! Output is UTF-8, comma-delimited, with a header row and no index column.
//! Files are written to a temporary sibling and then renamed over the target,
//! so a failed write leaves any previous output intact.

use chrono::Timelike;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{WriteError, WriteResult};
use crate::models::{Cell, Column, Table};

/// Output file written when the caller does not pick one.
pub const DEFAULT_OUTPUT: &str = "Clean_Sales_Data_Processed.csv";

const DATE_ONLY: &str = "%Y-%m-%d";
const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";

/// Render a number. NaN is written as an empty field.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        String::new()
    } else {
        n.to_string()
    }
}

/// Dates print without a time part when every date in the column is at midnight.
fn date_format(column: &Column) -> &'static str {
    let all_midnight = column
        .cells
        .iter()
        .filter_map(Cell::as_date)
        .all(|d| d.num_seconds_from_midnight() == 0 && d.nanosecond() == 0);

    if all_midnight {
        DATE_ONLY
    } else {
        DATE_TIME
    }
}

fn render_cell(cell: &Cell, date_fmt: &str) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(n) => format_number(*n),
        Cell::Date(d) => d.format(date_fmt).to_string(),
        Cell::Missing => String::new(),
    }
}

/// Write `table` as CSV to any writer.
pub fn write_to<W: Write>(table: &Table, writer: W) -> WriteResult<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(table.columns().iter().map(|c| c.name.as_str()))?;

    let formats: Vec<&str> = table.columns().iter().map(date_format).collect();
    for row in table.rows() {
        let record = row
            .iter()
            .zip(&formats)
            .map(|(cell, fmt)| render_cell(cell, fmt));
        wtr.write_record(record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render `table` to a CSV string.
pub fn render_csv(table: &Table) -> WriteResult<String> {
    let mut buf = Vec::new();
    write_to(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `table` to `path`, replacing any existing file.
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> WriteResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_to(table, &mut tmp)?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| WriteError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32, h: u32) -> Cell {
        Cell::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap())
    }

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new("Date", vec![date(2024, 1, 15, 0), Cell::Missing]),
            Column::new("Region", vec![Cell::text("North"), Cell::text("a, b")]),
            Column::new("Sales", vec![Cell::Number(100.0), Cell::Number(0.0)]),
            Column::new("Margin_Percentage", vec![Cell::Number(0.6), Cell::Number(f64::NEG_INFINITY)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_csv() {
        let csv = render_csv(&sample()).unwrap();
        assert_eq!(
            csv,
            "Date,Region,Sales,Margin_Percentage\n\
             2024-01-15,North,100,0.6\n\
             ,\"a, b\",0,-inf\n"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(60.0), "60");
        assert_eq!(format_number(-10.0), "-10");
        assert_eq!(format_number(0.33), "0.33");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NAN), "");
    }

    #[test]
    fn test_datetime_column_keeps_time() {
        let table = Table::from_columns(vec![Column::new(
            "Date",
            vec![date(2024, 1, 15, 0), date(2024, 1, 16, 9)],
        )])
        .unwrap();
        let csv = render_csv(&table).unwrap();
        assert_eq!(csv, "Date\n2024-01-15 00:00:00\n2024-01-16 09:00:00\n");
    }

    #[test]
    fn test_header_only_for_empty_table() {
        let table = Table::from_columns(vec![
            Column::new("A", vec![]),
            Column::new("B", vec![]),
        ])
        .unwrap();
        assert_eq!(render_csv(&table).unwrap(), "A,B\n");
    }

    #[test]
    fn test_write_csv_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT);
        fs::write(&path, "stale").unwrap();

        write_csv(&sample(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Date,Region,Sales,Margin_Percentage\n"));
        // Only the output itself is left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_csv_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("out.csv");

        let err = write_csv(&sample(), &path).unwrap_err();
        assert!(matches!(err, WriteError::Io(_)));
        assert!(!path.exists());
    }
}
