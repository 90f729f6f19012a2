//! Post-transform checks on the cleaned table.
//!
//! The cleaning steps may only add the derived columns and rewrite cells in
//! place. These checks compare the table after cleaning against the shape it
//! had right after loading.
//!
//! # Example
//!
//! ```rust,ignore
//! use salesclean::validation::{check_invariants, TableShape};
//!
//! let before = TableShape::of(&table);
//! clean_table(&mut table, &profile)?;
//! check_invariants(&before, &table, true)?;
//! ```

use serde::Serialize;

use crate::models::{columns, Table};

/// Row count and column order of a table at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableShape {
    pub row_count: usize,
    pub columns: Vec<String>,
}

impl TableShape {
    pub fn of(table: &Table) -> Self {
        Self {
            row_count: table.row_count(),
            columns: table.column_names(),
        }
    }
}

/// Check the cleaned table against its loaded shape.
///
/// # Returns
/// * `Ok(())` if every check passes
/// * `Err(Vec<String>)` with one message per failed check
pub fn check_invariants(
    before: &TableShape,
    after: &Table,
    margins_expected: bool,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let names = after.column_names();

    if after.row_count() != before.row_count {
        errors.push(format!(
            "row count changed from {} to {}",
            before.row_count,
            after.row_count()
        ));
    }

    if names.len() < before.columns.len() || names[..before.columns.len()] != before.columns[..] {
        errors.push("input columns were removed or reordered".to_string());
    }

    let derived = [columns::GROSS_MARGIN, columns::MARGIN_PERCENTAGE];
    for name in derived {
        let present = after.has_column(name);
        if margins_expected && !present {
            errors.push(format!("derived column '{}' is missing", name));
        }
        if !margins_expected && present && !before.columns.iter().any(|c| c == name) {
            errors.push(format!("derived column '{}' added without its inputs", name));
        }
    }

    let unexpected: Vec<&String> = names
        .iter()
        .filter(|n| !before.columns.contains(n) && !derived.contains(&n.as_str()))
        .collect();
    if !unexpected.is_empty() {
        errors.push(format!("unexpected new columns: {:?}", unexpected));
    }

    for column in after.columns() {
        if column.len() != after.row_count() {
            errors.push(format!(
                "column '{}' has {} cells, expected {}",
                column.name,
                column.len(),
                after.row_count()
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
