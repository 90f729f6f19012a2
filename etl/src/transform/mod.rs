//! Transformation module.
//!
//! This module handles the in-memory cleaning of a sales table:
//! - Steps: the cleaning steps and their fixed order
//! - Dates, Text, Margins, Fill: one module per step
//! - Pipeline: load, clean, check and export in one call

pub mod dates;
pub mod fill;
pub mod margins;
pub mod pipeline;
pub mod steps;
pub mod text;

pub use pipeline::*;
pub use steps::{steps_description, CleaningStep, StepOutcome};
