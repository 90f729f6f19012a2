//! Error types for the salesclean pipeline.
//!
//! This module defines one error type per layer:
//!
//! - [`LoadError`] - reading and parsing the input spreadsheet
//! - [`TransformError`] - in-memory cleaning steps
//! - [`WriteError`] - exporting the cleaned table
//! - [`ConfigError`] - loading a cleaning profile
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while loading the input table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input path does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded.
    #[error("Failed to decode input: {0}")]
    Encoding(String),

    /// Malformed tabular content.
    #[error("Invalid table format: {0}")]
    Format(String),

    /// Empty file.
    #[error("Input file is empty")]
    EmptyFile,

    /// Header row present but without any column names.
    #[error("No headers found in input")]
    NoHeaders,

    /// Workbook could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Excel(String),
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Format(err.to_string())
    }
}

impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        LoadError::Excel(err.to_string())
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors raised by the cleaning steps.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Sales is zero while strict division is requested.
    #[error("Sales is zero at row {row}; margin percentage is undefined")]
    ZeroSales { row: usize },

    /// A column does not match the table's row count.
    #[error("Column '{column}' has {found} cells, table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while exporting the cleaned table.
#[derive(Debug, Error)]
pub enum WriteError {
    /// IO failure (permissions, disk full, missing directory).
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure.
    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Temporary file could not be moved onto the target path.
    #[error("Failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors from loading a cleaning profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Profile parsed but is unusable.
    #[error("Invalid profile: {0}")]
    Invalid(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run_pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input could not be loaded.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// A cleaning step failed.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Output could not be written.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Profile could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Post-transform checks failed.
    #[error("Invariant violated: {0}")]
    InvariantViolated(String),

    /// Run report could not be written.
    #[error("Report error: {0}")]
    Report(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for transformation steps.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for export operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // LoadError -> PipelineError
        let load_err = LoadError::EmptyFile;
        let pipeline_err: PipelineError = load_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::ZeroSales { row: 2 };
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("row 2"));
    }

    #[test]
    fn test_file_not_found_names_path() {
        let err = LoadError::FileNotFound(PathBuf::from("Sales_Dataset_Raw.xlsx"));
        assert!(err.to_string().contains("Sales_Dataset_Raw.xlsx"));
    }

    #[test]
    fn test_column_length_format() {
        let err = TransformError::ColumnLength {
            column: "Sales".into(),
            expected: 3,
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("Sales"));
        assert!(msg.contains("3 rows"));
    }
}
