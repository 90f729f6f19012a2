//! Derived columns: `Gross_Margin` and `Margin_Percentage`.
//!
//! Margins follow IEEE-754: `Sales == 0` yields `inf`, `-inf` or NaN under
//! [`DivisionPolicy::Propagate`]. [`DivisionPolicy::Strict`] turns a zero
//! divisor into [`TransformError::ZeroSales`] before the table is touched.

use super::steps::{CleaningStep, StepOutcome};
use crate::config::DivisionPolicy;
use crate::error::{TransformError, TransformResult};
use crate::models::{columns, Cell, Table};

/// Round to two decimals, ties to even. Non-finite values pass through.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// Margin pair for one row, or `None` when either operand is not numeric.
pub fn margin(sales: &Cell, cost: &Cell) -> Option<(f64, f64)> {
    let sales = sales.as_number()?;
    let cost = cost.as_number()?;
    let gross = sales - cost;
    Some((gross, round2(gross / sales)))
}

/// Append (or overwrite) the derived columns.
///
/// Both source columns must exist; the pipeline checks this through
/// [`crate::models::Capabilities`].
pub fn derive_margins(
    table: &mut Table,
    sales_column: &str,
    cost_column: &str,
    policy: DivisionPolicy,
) -> TransformResult<StepOutcome> {
    let mut outcome = StepOutcome::new(CleaningStep::DeriveMargins);
    let (Some(sales), Some(cost)) = (table.column(sales_column), table.column(cost_column)) else {
        return Ok(outcome);
    };

    let mut gross_cells = Vec::with_capacity(table.row_count());
    let mut pct_cells = Vec::with_capacity(table.row_count());

    for (row, (s, c)) in sales.cells.iter().zip(&cost.cells).enumerate() {
        match margin(s, c) {
            Some((gross, pct)) => {
                if !pct.is_finite() {
                    if policy == DivisionPolicy::Strict && s.as_number() == Some(0.0) {
                        return Err(TransformError::ZeroSales { row });
                    }
                    outcome.non_finite += 1;
                }
                gross_cells.push(Cell::Number(gross));
                pct_cells.push(Cell::Number(pct));
            }
            None => {
                gross_cells.push(Cell::Missing);
                pct_cells.push(Cell::Missing);
            }
        }
    }

    outcome.changed = gross_cells.len() + pct_cells.len();
    table.push_column(columns::GROSS_MARGIN, gross_cells)?;
    table.push_column(columns::MARGIN_PERCENTAGE, pct_cells)?;

    outcome.applied = true;
    outcome.columns = vec![
        columns::GROSS_MARGIN.to_string(),
        columns::MARGIN_PERCENTAGE.to_string(),
    ];
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    fn sales_cost(sales: Vec<Cell>, cost: Vec<Cell>) -> Table {
        Table::from_columns(vec![Column::new("Sales", sales), Column::new("Cost", cost)]).unwrap()
    }

    #[test]
    fn test_basic_margin() {
        let mut table = sales_cost(vec![Cell::Number(100.0)], vec![Cell::Number(40.0)]);
        let outcome = derive_margins(&mut table, "Sales", "Cost", DivisionPolicy::Propagate).unwrap();

        assert!(outcome.applied);
        assert_eq!(table.cell(0, "Gross_Margin"), Some(&Cell::Number(60.0)));
        assert_eq!(table.cell(0, "Margin_Percentage"), Some(&Cell::Number(0.6)));
        assert_eq!(table.column_names(), vec!["Sales", "Cost", "Gross_Margin", "Margin_Percentage"]);
    }

    #[test]
    fn test_rounding() {
        let mut table = sales_cost(vec![Cell::Number(3.0)], vec![Cell::Number(2.0)]);
        derive_margins(&mut table, "Sales", "Cost", DivisionPolicy::Propagate).unwrap();
        assert_eq!(table.cell(0, "Margin_Percentage"), Some(&Cell::Number(0.33)));
    }

    #[test]
    fn test_rounding_ties_to_even() {
        assert_eq!(margin(&Cell::Number(8.0), &Cell::Number(7.0)), Some((1.0, 0.12)));
        assert_eq!(margin(&Cell::Number(8.0), &Cell::Number(3.0)), Some((5.0, 0.62)));
        assert_eq!(margin(&Cell::Number(8.0), &Cell::Number(9.0)), Some((-1.0, -0.12)));
    }

    #[test]
    fn test_zero_sales_propagates() {
        let mut table = sales_cost(
            vec![Cell::Number(0.0), Cell::Number(0.0)],
            vec![Cell::Number(10.0), Cell::Number(0.0)],
        );
        let outcome = derive_margins(&mut table, "Sales", "Cost", DivisionPolicy::Propagate).unwrap();

        assert_eq!(outcome.non_finite, 2);
        assert_eq!(table.cell(0, "Gross_Margin"), Some(&Cell::Number(-10.0)));
        assert_eq!(
            table.cell(0, "Margin_Percentage"),
            Some(&Cell::Number(f64::NEG_INFINITY))
        );
        let nan = table.cell(1, "Margin_Percentage").and_then(Cell::as_number).unwrap();
        assert!(nan.is_nan());
    }

    #[test]
    fn test_zero_sales_strict() {
        let mut table = sales_cost(
            vec![Cell::Number(100.0), Cell::Number(0.0)],
            vec![Cell::Number(40.0), Cell::Number(10.0)],
        );
        let err = derive_margins(&mut table, "Sales", "Cost", DivisionPolicy::Strict).unwrap_err();

        assert!(matches!(err, TransformError::ZeroSales { row: 1 }));
        // Nothing added on failure
        assert!(!table.has_column("Gross_Margin"));
    }

    #[test]
    fn test_missing_operand_gives_missing_margins() {
        let mut table = sales_cost(
            vec![Cell::Number(50.0), Cell::text("n/a-ish")],
            vec![Cell::Missing, Cell::Number(1.0)],
        );
        derive_margins(&mut table, "Sales", "Cost", DivisionPolicy::Propagate).unwrap();

        assert_eq!(table.cell(0, "Gross_Margin"), Some(&Cell::Missing));
        assert_eq!(table.cell(1, "Margin_Percentage"), Some(&Cell::Missing));
    }

    #[test]
    fn test_guard_without_cost() {
        let mut table = Table::from_columns(vec![Column::new("Sales", vec![Cell::Number(1.0)])]).unwrap();
        let outcome = derive_margins(&mut table, "Sales", "Cost", DivisionPolicy::Propagate).unwrap();

        assert!(!outcome.applied);
        assert_eq!(table.column_names(), vec!["Sales"]);
    }

    #[test]
    fn test_existing_derived_column_overwritten_in_place() {
        let mut table = Table::from_columns(vec![
            Column::new("Gross_Margin", vec![Cell::text("stale")]),
            Column::new("Sales", vec![Cell::Number(10.0)]),
            Column::new("Cost", vec![Cell::Number(4.0)]),
        ])
        .unwrap();
        derive_margins(&mut table, "Sales", "Cost", DivisionPolicy::Propagate).unwrap();

        assert_eq!(
            table.column_names(),
            vec!["Gross_Margin", "Sales", "Cost", "Margin_Percentage"]
        );
        assert_eq!(table.cell(0, "Gross_Margin"), Some(&Cell::Number(6.0)));
    }
}
