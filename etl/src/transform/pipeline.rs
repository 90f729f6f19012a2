//! High-level pipeline API: load, clean, check, export.
//!
//! This module combines every step behind one call. Steps always run in the
//! order given by [`CleaningStep::ORDER`], followed by the export.
//!
//! # Example
//!
//! ```rust,ignore
//! use salesclean::{run_pipeline, CleanOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = run_pipeline(&CleanOptions::default())?;
//!     println!("Wrote {} rows to {}", summary.row_count, summary.output.display());
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::steps::{CleaningStep, StepOutcome};
use crate::config::CleaningProfile;
use crate::error::{PipelineError, PipelineResult, TransformResult};
use crate::export::{write_csv, DEFAULT_OUTPUT};
use crate::logs::{
    log_error, log_info, log_info_indent, log_success, log_warning, LogBroadcaster, LOG_BROADCASTER,
};
use crate::models::{Capabilities, Table};
use crate::parser::{load_table, LoadInfo, ParseResult};
use crate::report::RunReport;
use crate::validation::{check_invariants, TableShape};

/// Input read when the caller does not pick one.
pub const DEFAULT_INPUT: &str = "Sales_Dataset_Raw.xlsx";

/// Options for a pipeline run
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Dataset to load (CSV or Excel)
    pub input: PathBuf,

    /// Destination CSV, replaced if it exists
    pub output: PathBuf,

    /// Column names, fill value and division policy
    pub profile: CleaningProfile,

    /// Write a JSON run report here
    pub report: Option<PathBuf>,

    /// Don't print progress to stdout
    pub quiet: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            profile: CleaningProfile::default(),
            report: None,
            quiet: false,
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,

    /// Loader metadata
    pub info: LoadInfo,

    /// One outcome per cleaning step, in execution order
    pub outcomes: Vec<StepOutcome>,

    /// Path the cleaned table was written to
    pub output: PathBuf,

    pub row_count: usize,

    /// Output column names, in order
    pub columns: Vec<String>,
}

/// Run the in-memory cleaning steps on a table.
///
/// Stops at the first failing step; with the default profile no step fails.
pub fn clean_table(table: &mut Table, profile: &CleaningProfile) -> TransformResult<Vec<StepOutcome>> {
    let mut outcomes = Vec::with_capacity(CleaningStep::ORDER.len());

    for step in CleaningStep::ORDER {
        let outcome = step.apply(table, profile).map_err(|e| {
            log_error(format!("{} failed: {}", step, e));
            e
        })?;
        log_outcome(&outcome);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn log_outcome(outcome: &StepOutcome) {
    if !outcome.applied {
        log_info_indent(outcome.summary(), 1);
        return;
    }
    log_success(outcome.summary());
    if outcome.coerced > 0 {
        log_warning(format!(
            "{} value(s) in [{}] could not be parsed and are now empty",
            outcome.coerced,
            outcome.columns.join(", ")
        ));
    }
    if outcome.non_finite > 0 {
        log_warning(format!(
            "{} margin(s) are non-finite (Sales = 0)",
            outcome.non_finite
        ));
    }
}

/// Load, clean and export one dataset.
///
/// This is the main entry point. It:
/// 1. Loads the input (CSV or Excel)
/// 2. Runs the cleaning steps in fixed order
/// 3. Checks the row count and column set against the loaded table
/// 4. Writes the CSV output atomically
/// 5. Saves the run report if one was requested
///
/// Nothing is written when any of steps 1-3 fails.
pub fn run_pipeline(options: &CleanOptions) -> PipelineResult<RunSummary> {
    apply_log_settings(&LOG_BROADCASTER, options);
    options.profile.validate()?;

    log_info("Loading dataset...");
    let ParseResult { mut table, info } = load_table(&options.input)?;
    log_load_info(&info, &table);

    let mut report = RunReport::start(info.clone());
    let before = TableShape::of(&table);
    let caps = Capabilities::detect(&table, &options.profile);
    if !caps.margins {
        log_info_indent(
            format!(
                "'{}' or '{}' absent, derived columns will not be added",
                options.profile.sales_column, options.profile.cost_column
            ),
            1,
        );
    }

    let outcomes = clean_table(&mut table, &options.profile)?;

    check_invariants(&before, &table, caps.margins)
        .map_err(|errors| PipelineError::InvariantViolated(errors.join("; ")))?;

    write_csv(&table, &options.output)?;
    log_success(format!(
        "Data successfully processed and exported to: {}",
        options.output.display()
    ));

    report.finish(
        outcomes.clone(),
        &options.output,
        table.row_count(),
        table.column_names(),
    );
    if let Some(path) = &options.report {
        save_report(&report, path)?;
    }

    Ok(RunSummary {
        run_id: report.run_id,
        info,
        outcomes,
        output: options.output.clone(),
        row_count: table.row_count(),
        columns: table.column_names(),
    })
}

/// Each run decides for itself whether progress is printed.
fn apply_log_settings(broadcaster: &LogBroadcaster, options: &CleanOptions) {
    broadcaster.set_quiet(options.quiet);
}

fn log_load_info(info: &LoadInfo, table: &Table) {
    if let Some(encoding) = &info.encoding {
        log_success(format!("Detected encoding: {}", encoding));
    }
    if let Some(delimiter) = info.delimiter {
        log_success(format!("Detected separator: '{}'", format_delimiter(delimiter)));
    }
    log_success(format!(
        "Read {} rows, {} columns",
        table.row_count(),
        table.column_count()
    ));
}

fn save_report(report: &RunReport, path: &Path) -> PipelineResult<()> {
    report
        .save(path)
        .map_err(|e| PipelineError::Report(format!("{}: {}", path.display(), e)))?;
    log_info(format!("Run report saved to: {}", path.display()));
    Ok(())
}

pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
