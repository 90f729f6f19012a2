//! Run report - JSON summary of one pipeline run
//!
//! Written only when the caller asks for it (`--report <path>`).

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::parser::LoadInfo;
use crate::transform::steps::StepOutcome;

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique identifier of this run
    pub run_id: Uuid,
    /// Start timestamp (RFC 3339)
    pub started_at: String,
    /// Finish timestamp (RFC 3339)
    pub finished_at: String,
    /// What was loaded
    pub input: LoadInfo,
    /// One entry per cleaning step, in execution order
    pub steps: Vec<StepOutcome>,
    /// Where the cleaned table was written
    pub output: PathBuf,
    pub row_count: usize,
    pub columns: Vec<String>,
}

impl RunReport {
    /// Start a report for a run beginning now
    pub fn start(input: LoadInfo) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now.clone(),
            finished_at: now,
            input,
            steps: Vec::new(),
            output: PathBuf::new(),
            row_count: 0,
            columns: Vec::new(),
        }
    }

    /// Record the final state and stamp the finish time
    pub fn finish(&mut self, steps: Vec<StepOutcome>, output: &Path, row_count: usize, columns: Vec<String>) {
        self.steps = steps;
        self.output = output.to_path_buf();
        self.row_count = row_count;
        self.columns = columns;
        self.finished_at = chrono::Utc::now().to_rfc3339();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save the report as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let content = self.to_json()?;
        fs::write(path, content)
    }
}
