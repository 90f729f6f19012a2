//! Cleaning profile - which columns each step acts on.
//!
//! The default profile reproduces the fixed sales layout:
//! `Date`, `Product Name` / `Customer Name` / `Region`, `Sales` and `Cost`.
//! A profile can be stored as JSON and passed to the CLI with `--config`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::columns;

/// What to do when `Gross_Margin / Sales` has no finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionPolicy {
    /// Keep IEEE-754 results (`inf`, `-inf`, NaN) and report them.
    #[default]
    Propagate,
    /// Abort the run on the first zero-sales row.
    Strict,
}

/// Column selection for every cleaning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningProfile {
    /// Column parsed as dates.
    pub date_column: String,

    /// Columns stripped and title-cased.
    pub text_columns: Vec<String>,

    /// Minuend and divisor of the margin calculation.
    pub sales_column: String,

    /// Subtrahend of the margin calculation.
    pub cost_column: String,

    /// Columns whose missing cells are filled.
    pub fill_columns: Vec<String>,

    /// Value written into missing fill cells.
    pub fill_value: f64,

    /// Zero-sales handling.
    pub division_policy: DivisionPolicy,
}

impl Default for CleaningProfile {
    fn default() -> Self {
        Self {
            date_column: columns::DATE.to_string(),
            text_columns: vec![
                columns::PRODUCT_NAME.to_string(),
                columns::CUSTOMER_NAME.to_string(),
                columns::REGION.to_string(),
            ],
            sales_column: columns::SALES.to_string(),
            cost_column: columns::COST.to_string(),
            fill_columns: vec![columns::COST.to_string(), columns::SALES.to_string()],
            fill_value: 0.0,
            division_policy: DivisionPolicy::Propagate,
        }
    }
}

impl CleaningProfile {
    /// Parse and validate a profile from JSON text.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read a profile from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject profiles the pipeline cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        let named = [
            ("date_column", &self.date_column),
            ("sales_column", &self.sales_column),
            ("cost_column", &self.cost_column),
        ];
        for (field, value) in named {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", field)));
            }
        }

        if self
            .text_columns
            .iter()
            .chain(self.fill_columns.iter())
            .any(|c| c.trim().is_empty())
        {
            return Err(ConfigError::Invalid("column names must not be empty".into()));
        }

        let derived = [columns::GROSS_MARGIN, columns::MARGIN_PERCENTAGE];
        if self.fill_columns.iter().any(|c| derived.contains(&c.as_str())) {
            return Err(ConfigError::Invalid(
                "derived columns cannot be fill targets".into(),
            ));
        }

        if !self.fill_value.is_finite() {
            return Err(ConfigError::Invalid("fill_value must be finite".into()));
        }

        Ok(())
    }
}
