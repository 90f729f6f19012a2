//! Missing-value filler for the raw numeric columns.

use super::steps::{CleaningStep, StepOutcome};
use crate::models::{Cell, Table};

/// Replace missing cells of each listed column with `value`.
///
/// Only `Missing` is replaced; text and numbers are left alone.
pub fn fill_missing(table: &mut Table, columns: &[String], value: f64) -> StepOutcome {
    let mut outcome = StepOutcome::new(CleaningStep::FillMissing);

    for name in columns {
        let Some(col) = table.column_mut(name) else {
            continue;
        };
        for cell in col.cells.iter_mut().filter(|c| c.is_missing()) {
            *cell = Cell::Number(value);
            outcome.changed += 1;
        }
        outcome.columns.push(name.clone());
    }

    outcome.applied = !outcome.columns.is_empty();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    #[test]
    fn test_fill_cost_only_where_missing() {
        let mut table = Table::from_columns(vec![
            Column::new("Cost", vec![Cell::Missing, Cell::Number(3.0)]),
            Column::new("Sales", vec![Cell::Number(50.0), Cell::Number(7.0)]),
        ])
        .unwrap();

        let columns = vec!["Cost".to_string(), "Sales".to_string()];
        let outcome = fill_missing(&mut table, &columns, 0.0);

        assert_eq!(outcome.changed, 1);
        assert_eq!(table.cell(0, "Cost"), Some(&Cell::Number(0.0)));
        assert_eq!(table.cell(0, "Sales"), Some(&Cell::Number(50.0)));
        assert_eq!(table.cell(1, "Cost"), Some(&Cell::Number(3.0)));
    }

    #[test]
    fn test_other_columns_keep_missing() {
        let mut table = Table::from_columns(vec![
            Column::new("Cost", vec![Cell::Missing]),
            Column::new("Gross_Margin", vec![Cell::Missing]),
            Column::new("Region", vec![Cell::Missing]),
        ])
        .unwrap();

        fill_missing(&mut table, &["Cost".to_string()], 0.0);

        assert_eq!(table.cell(0, "Gross_Margin"), Some(&Cell::Missing));
        assert_eq!(table.cell(0, "Region"), Some(&Cell::Missing));
    }

    #[test]
    fn test_text_in_fill_column_untouched() {
        let mut table =
            Table::from_columns(vec![Column::new("Sales", vec![Cell::text("unknown")])]).unwrap();
        let outcome = fill_missing(&mut table, &["Sales".to_string()], 0.0);

        assert_eq!(outcome.changed, 0);
        assert_eq!(table.cell(0, "Sales"), Some(&Cell::text("unknown")));
    }

    #[test]
    fn test_no_fill_columns_present() {
        let mut table =
            Table::from_columns(vec![Column::new("Region", vec![Cell::Missing])]).unwrap();
        let outcome = fill_missing(&mut table, &["Cost".to_string()], 0.0);
        assert!(!outcome.applied);
    }
}
