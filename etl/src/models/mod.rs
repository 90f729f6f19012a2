//! Domain models for the salesclean pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`Cell`] - One typed value (date, text, number or missing)
//! - [`Column`] - A named, ordered run of cells
//! - [`Table`] - Schema-flexible set of equal-length columns
//! - [`Capabilities`] - Which cleaning steps a given table supports
//! - [`columns`] - Well-known column names

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use crate::config::CleaningProfile;
use crate::error::{TransformError, TransformResult};

// =============================================================================
// Column names
// =============================================================================

/// Column names the pipeline knows about.
pub mod columns {
    pub const DATE: &str = "Date";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const CUSTOMER_NAME: &str = "Customer Name";
    pub const REGION: &str = "Region";
    pub const SALES: &str = "Sales";
    pub const COST: &str = "Cost";
    pub const GROSS_MARGIN: &str = "Gross_Margin";
    pub const MARGIN_PERCENTAGE: &str = "Margin_Percentage";
}

// =============================================================================
// Cell
// =============================================================================

/// A single value in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// Calendar date with optional time of day.
    Date(NaiveDateTime),
    /// Free text.
    Text(String),
    /// Any numeric value, including non-finite results.
    Number(f64),
    /// No value.
    Missing,
}

impl Cell {
    /// Build a text cell, mapping an empty string to `Missing`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric view of the cell. Text is not coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Date(_) => CellKind::Date,
            Cell::Text(_) => CellKind::Text,
            Cell::Number(_) => CellKind::Number,
            Cell::Missing => CellKind::Missing,
        }
    }
}

/// Discriminant of a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Date,
    Text,
    Number,
    Missing,
}

// =============================================================================
// Column
// =============================================================================

/// Summary type of a column, derived from its non-missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Date,
    Text,
    Number,
    Mixed,
    Empty,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
            ColumnKind::Number => "number",
            ColumnKind::Mixed => "mixed",
            ColumnKind::Empty => "empty",
        };
        f.write_str(s)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Kind shared by every non-missing cell, or `Mixed`.
    pub fn kind(&self) -> ColumnKind {
        let mut kinds = self
            .cells
            .iter()
            .map(Cell::kind)
            .filter(|k| *k != CellKind::Missing);

        let first = match kinds.next() {
            Some(k) => k,
            None => return ColumnKind::Empty,
        };
        if kinds.any(|k| k != first) {
            return ColumnKind::Mixed;
        }
        match first {
            CellKind::Date => ColumnKind::Date,
            CellKind::Text => ColumnKind::Text,
            CellKind::Number => ColumnKind::Number,
            CellKind::Missing => ColumnKind::Empty,
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// In-memory table: ordered columns of equal length.
///
/// Column order is insertion order. Row order is never changed by any
/// operation on this type.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    row_count: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, checking that lengths agree.
    pub fn from_columns(columns: Vec<Column>) -> TransformResult<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column.name, column.cells)?;
        }
        Ok(table)
    }

    /// Append a column, or replace the cells of an existing one in place.
    ///
    /// The first column fixes the row count of the table.
    pub fn push_column(&mut self, name: impl Into<String>, cells: Vec<Cell>) -> TransformResult<()> {
        let name = name.into();
        if self.columns.is_empty() {
            self.row_count = cells.len();
        } else if cells.len() != self.row_count {
            return Err(TransformError::ColumnLength {
                column: name,
                expected: self.row_count,
                found: cells.len(),
            });
        }

        match self.index.get(&name) {
            Some(&i) => self.columns[i].cells = cells,
            None => {
                self.index.insert(name.clone(), self.columns.len());
                self.columns.push(Column::new(name, cells));
            }
        }
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.columns[i]),
            None => None,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at (`row`, `column`), if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        self.column(column).and_then(|c| c.cells.get(row))
    }

    /// Iterate rows as slices of cell references in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.row_count).map(move |r| self.columns.iter().map(|c| &c.cells[r]).collect())
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// Which steps can run against a table, given a cleaning profile.
///
/// Computed from the table's column set before each step instead of probing
/// for columns inside the step itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Date column present.
    pub dates: bool,
    /// Text columns present, in profile order.
    pub text_columns: Vec<String>,
    /// Both sales and cost present.
    pub margins: bool,
    /// Fill columns present, in profile order.
    pub fill_columns: Vec<String>,
}

impl Capabilities {
    pub fn detect(table: &Table, profile: &CleaningProfile) -> Self {
        let present = |names: &[String]| -> Vec<String> {
            names
                .iter()
                .filter(|n| table.has_column(n))
                .cloned()
                .collect()
        };

        Self {
            dates: table.has_column(&profile.date_column),
            text_columns: present(&profile.text_columns),
            margins: table.has_column(&profile.sales_column)
                && table.has_column(&profile.cost_column),
            fill_columns: present(&profile.fill_columns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Number(*v)).collect()
    }

    #[test]
    fn test_push_column_preserves_order() {
        let mut table = Table::new();
        table.push_column("b", numbers(&[1.0, 2.0])).unwrap();
        table.push_column("a", numbers(&[3.0, 4.0])).unwrap();

        assert_eq!(table.column_names(), vec!["b", "a"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_push_column_rejects_length_mismatch() {
        let mut table = Table::new();
        table.push_column("a", numbers(&[1.0, 2.0])).unwrap();
        let err = table.push_column("b", numbers(&[1.0])).unwrap_err();
        assert!(matches!(err, TransformError::ColumnLength { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_push_existing_column_replaces_in_place() {
        let mut table = Table::new();
        table.push_column("a", numbers(&[1.0])).unwrap();
        table.push_column("b", numbers(&[2.0])).unwrap();
        table.push_column("a", numbers(&[9.0])).unwrap();

        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.cell(0, "a"), Some(&Cell::Number(9.0)));
    }

    #[test]
    fn test_column_kind() {
        let col = Column::new("x", vec![Cell::Number(1.0), Cell::Missing]);
        assert_eq!(col.kind(), ColumnKind::Number);

        let col = Column::new("x", vec![Cell::Number(1.0), Cell::text("a")]);
        assert_eq!(col.kind(), ColumnKind::Mixed);

        let col = Column::new("x", vec![Cell::Missing]);
        assert_eq!(col.kind(), ColumnKind::Empty);
    }

    #[test]
    fn test_empty_text_is_missing() {
        assert_eq!(Cell::text(""), Cell::Missing);
        assert_eq!(Cell::text("x"), Cell::Text("x".into()));
    }

    #[test]
    fn test_capabilities_guard_margins() {
        let profile = CleaningProfile::default();
        let mut table = Table::new();
        table.push_column(columns::SALES, numbers(&[100.0])).unwrap();
        table.push_column(columns::REGION, vec![Cell::text("north")]).unwrap();

        let caps = Capabilities::detect(&table, &profile);
        assert!(!caps.margins);
        assert!(!caps.dates);
        assert_eq!(caps.text_columns, vec![columns::REGION]);
        assert_eq!(caps.fill_columns, vec![columns::SALES]);

        table.push_column(columns::COST, numbers(&[40.0])).unwrap();
        assert!(Capabilities::detect(&table, &profile).margins);
    }

    #[test]
    fn test_rows_iterate_in_column_order() {
        let table = Table::from_columns(vec![
            Column::new("a", numbers(&[1.0, 2.0])),
            Column::new("b", vec![Cell::text("x"), Cell::Missing]),
        ])
        .unwrap();

        let rows: Vec<Vec<&Cell>> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec![&Cell::Number(2.0), &Cell::Missing]);
    }
}
