//! Lenient date parsing and the date normalizer step.
//!
//! Anything that cannot be read as a date becomes a missing cell. Parsing
//! never fails the run.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::steps::{CleaningStep, StepOutcome};
use crate::models::{Cell, Table};

/// Years representable by the downstream timestamp type.
const MIN_YEAR: i32 = 1678;
const MAX_YEAR: i32 = 2261;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

// Two-digit years first: `%Y` would happily read "24" as year 24.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%m.%d.%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%a, %d %b %Y",
    "%a %d %b %Y",
    "%A, %B %d, %Y",
    "%A, %d %B %Y",
];

/// Formats without a day; they resolve to the first of the month.
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%m/%Y", "%b %Y", "%B %Y"];

static ORDINAL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("ordinal pattern is valid")
});

/// Parse a date or datetime string as leniently as practical.
///
/// Month-first readings win over day-first ones; a day-first reading is only
/// used when the month-first one is invalid. Offsets are converted to UTC.
pub fn parse_lenient(raw: &str) -> Option<NaiveDateTime> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let s = ORDINAL_SUFFIX.replace_all(&collapsed, "$1");
    let s = s.as_ref();

    parse_with_offset(s)
        .or_else(|| parse_datetime(s))
        .or_else(|| parse_date(s))
        .or_else(|| parse_year_month(s))
        .or_else(|| parse_year(s))
}

/// Every candidate reading must pass this, so an out-of-range early match
/// does not hide a later format.
fn in_range(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    (MIN_YEAR..=MAX_YEAR).contains(&dt.year()).then_some(dt)
}

fn parse_with_offset(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %z"))
        .ok()
        .and_then(|dt| in_range(dt.naive_utc()))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok().and_then(in_range))
}

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS
        .iter()
        .find_map(|f| {
            NaiveDate::parse_from_str(s, f)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .and_then(in_range)
        })
}

fn parse_year_month(s: &str) -> Option<NaiveDateTime> {
    let padded = format!("{}|1", s);
    MONTH_FORMATS
        .iter()
        .find_map(|f| {
            NaiveDate::parse_from_str(&padded, &format!("{}|%d", f))
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .and_then(in_range)
        })
}

fn parse_year(s: &str) -> Option<NaiveDateTime> {
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s.parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)?
        .and_hms_opt(0, 0, 0)
        .and_then(in_range)
}

/// Read a number as a compact `YYYYMMDD` date.
fn parse_compact_number(n: f64) -> Option<NaiveDateTime> {
    if n.fract() != 0.0 || !(10_000_000.0..=99_999_999.0).contains(&n) {
        return None;
    }
    let digits = format!("{}", n as i64);
    NaiveDate::parse_from_str(&digits, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(in_range)
}

/// Coerce one cell to a date, or to missing.
pub fn coerce_cell(cell: &Cell) -> Cell {
    let parsed = match cell {
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => parse_lenient(s),
        Cell::Number(n) => parse_compact_number(*n),
        Cell::Missing => None,
    };
    parsed.map(Cell::Date).unwrap_or(Cell::Missing)
}

/// Parse every cell of `column` into a date. Unparseable values become missing.
pub fn normalize_dates(table: &mut Table, column: &str) -> StepOutcome {
    let mut outcome = StepOutcome::new(CleaningStep::ParseDates);
    let Some(col) = table.column_mut(column) else {
        return outcome;
    };

    for cell in col.cells.iter_mut() {
        let coerced = coerce_cell(cell);
        if coerced != *cell {
            if coerced.is_missing() {
                outcome.coerced += 1;
            }
            outcome.changed += 1;
            *cell = coerced;
        }
    }

    outcome.applied = true;
    outcome.columns.push(column.to_string());
    outcome
}
