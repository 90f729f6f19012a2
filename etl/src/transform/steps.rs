//! Cleaning steps
//!
//! The four in-memory steps, in the only order the pipeline runs them.

use serde::{Deserialize, Serialize};

use super::{dates, fill, margins, text};
use crate::config::CleaningProfile;
use crate::error::TransformResult;
use crate::models::{Capabilities, Table};

/// In-memory cleaning steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStep {
    /// Parse the date column; unparseable values become missing
    ParseDates,

    /// Strip and title-case the categorical text columns
    NormalizeText,

    /// Add Gross_Margin and Margin_Percentage from sales and cost
    DeriveMargins,

    /// Replace missing sales/cost values with the fill value
    FillMissing,
}

impl CleaningStep {
    /// Fixed execution order. Margins are derived before the fill so that
    /// rows with missing inputs keep missing margins.
    pub const ORDER: [CleaningStep; 4] = [
        CleaningStep::ParseDates,
        CleaningStep::NormalizeText,
        CleaningStep::DeriveMargins,
        CleaningStep::FillMissing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CleaningStep::ParseDates => "parse_dates",
            CleaningStep::NormalizeText => "normalize_text",
            CleaningStep::DeriveMargins => "derive_margins",
            CleaningStep::FillMissing => "fill_missing",
        }
    }

    /// Apply this step, guarded by what the table supports.
    pub fn apply(&self, table: &mut Table, profile: &CleaningProfile) -> TransformResult<StepOutcome> {
        let caps = Capabilities::detect(table, profile);

        let outcome = match self {
            CleaningStep::ParseDates if caps.dates => {
                dates::normalize_dates(table, &profile.date_column)
            }
            CleaningStep::NormalizeText => text::normalize_text(table, &caps.text_columns),
            CleaningStep::DeriveMargins if caps.margins => margins::derive_margins(
                table,
                &profile.sales_column,
                &profile.cost_column,
                profile.division_policy,
            )?,
            CleaningStep::FillMissing => {
                fill::fill_missing(table, &caps.fill_columns, profile.fill_value)
            }
            _ => StepOutcome::new(*self),
        };

        Ok(outcome)
    }
}

impl std::fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a step did to the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: CleaningStep,
    /// False when the step's columns were absent
    pub applied: bool,
    /// Columns the step acted on or added
    pub columns: Vec<String>,
    /// Cells whose value changed
    pub changed: usize,
    /// Values coerced to missing
    pub coerced: usize,
    /// Non-finite derived values
    pub non_finite: usize,
}

impl StepOutcome {
    pub fn new(step: CleaningStep) -> Self {
        Self {
            step,
            applied: false,
            columns: Vec::new(),
            changed: 0,
            coerced: 0,
            non_finite: 0,
        }
    }

    pub fn summary(&self) -> String {
        if !self.applied {
            return format!("{}: skipped (columns absent)", self.step);
        }
        let mut s = format!(
            "{}: {} cells changed in [{}]",
            self.step,
            self.changed,
            self.columns.join(", ")
        );
        if self.coerced > 0 {
            s.push_str(&format!(", {} coerced to missing", self.coerced));
        }
        if self.non_finite > 0 {
            s.push_str(&format!(", {} non-finite", self.non_finite));
        }
        s
    }
}

/// Describe the pipeline steps for `salesclean steps`
pub fn steps_description() -> String {
    r#"Cleaning steps (always run in this order):

| # | Step | Columns | Behaviour |
|---|------|---------|-----------|
| 1 | parse_dates | Date | Lenient date parsing; unparseable values become empty |
| 2 | normalize_text | Product Name, Customer Name, Region | Strip whitespace, then Title Case |
| 3 | derive_margins | Sales, Cost | Gross_Margin = Sales - Cost; Margin_Percentage = round(Gross_Margin / Sales, 2) |
| 4 | fill_missing | Cost, Sales | Empty values become 0 |
| 5 | export | all | Comma-separated UTF-8 with header, no index column |

Absent columns skip their step. derive_margins needs both Sales and Cost.
With Sales = 0 the percentage is inf/-inf (or empty for 0/0) unless the
profile sets "division_policy": "strict", which aborts the run instead."#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Column};

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new("Date", vec![Cell::text("2024-01-15"), Cell::text("bad")]),
            Column::new("Region", vec![Cell::text(" north "), Cell::text("SOUTH EAST")]),
            Column::new("Sales", vec![Cell::Number(100.0), Cell::Missing]),
            Column::new("Cost", vec![Cell::Missing, Cell::Number(5.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_order_is_fixed() {
        let names: Vec<&str> = CleaningStep::ORDER.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["parse_dates", "normalize_text", "derive_margins", "fill_missing"]);
    }

    #[test]
    fn test_apply_dispatch() {
        let profile = CleaningProfile::default();
        let mut table = sample();

        let dates = CleaningStep::ParseDates.apply(&mut table, &profile).unwrap();
        assert_eq!(dates.coerced, 1);

        let text = CleaningStep::NormalizeText.apply(&mut table, &profile).unwrap();
        assert_eq!(text.columns, vec!["Region"]);

        let margins = CleaningStep::DeriveMargins.apply(&mut table, &profile).unwrap();
        assert!(margins.applied);
        // Both rows have a missing operand before the fill
        assert_eq!(table.cell(0, "Gross_Margin"), Some(&Cell::Missing));

        let fill = CleaningStep::FillMissing.apply(&mut table, &profile).unwrap();
        assert_eq!(fill.changed, 2);
        assert_eq!(table.cell(0, "Gross_Margin"), Some(&Cell::Missing));
    }

    #[test]
    fn test_skipped_step_outcome() {
        let profile = CleaningProfile::default();
        let mut table =
            Table::from_columns(vec![Column::new("Region", vec![Cell::text("x")])]).unwrap();

        let outcome = CleaningStep::ParseDates.apply(&mut table, &profile).unwrap();
        assert!(!outcome.applied);
        assert!(outcome.summary().contains("skipped"));
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut outcome = StepOutcome::new(CleaningStep::DeriveMargins);
        outcome.applied = true;
        outcome.columns = vec!["Gross_Margin".into()];
        outcome.non_finite = 1;
        let summary = outcome.summary();
        assert!(summary.contains("derive_margins"));
        assert!(summary.contains("1 non-finite"));
    }

    #[test]
    fn test_steps_description_lists_all() {
        let desc = steps_description();
        for step in CleaningStep::ORDER {
            assert!(desc.contains(step.name()));
        }
    }
}
