//! # Salesclean - batch cleaning for tabular sales data
//!
//! Salesclean loads a raw sales spreadsheet, normalizes its dates and text
//! fields, derives margin columns, fills missing amounts and writes a clean CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ XLSX / CSV  │────▶│   Parser    │────▶│  Transform  │────▶│  Clean CSV  │
//! │  (raw data) │     │ (auto-enc)  │     │ (4 steps)   │     │  (atomic)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use salesclean::{run_pipeline, CleanOptions};
//!
//! fn main() {
//!     let summary = run_pipeline(&CleanOptions::default()).unwrap();
//!     println!("Cleaned {} rows", summary.row_count);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Cell, Column, Table, Capabilities)
//! - [`parser`] - CSV and Excel loading with auto-detection
//! - [`transform`] - Cleaning steps and pipeline
//! - [`export`] - CSV writer
//! - [`validation`] - Post-transform checks
//! - [`config`] - Cleaning profile
//! - [`report`] - JSON run report
//! - [`logs`] - Progress log broadcaster

// Core modules
pub mod error;
pub mod models;

// Configuration
pub mod config;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod export;
pub mod report;

// Validation
pub mod validation;

// Progress
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, LoadError, PipelineError, PipelineResult, TransformError, WriteError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{columns, Capabilities, Cell, Column, ColumnKind, Table};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{CleaningProfile, DivisionPolicy};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, load_table, parse_bytes_auto,
    parse_csv_file_auto, LoadInfo, ParseResult, SourceFormat,
};

// =============================================================================
// Re-exports - Steps
// =============================================================================

pub use transform::steps::{steps_description, CleaningStep, StepOutcome};

// =============================================================================
// Re-exports - Export & Validation
// =============================================================================

pub use export::{render_csv, write_csv, DEFAULT_OUTPUT};
pub use validation::{check_invariants, TableShape};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use report::RunReport;
pub use transform::pipeline::{clean_table, run_pipeline, CleanOptions, RunSummary, DEFAULT_INPUT};
