//! Controller group: iteration range, output directory, write intervals.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What to do when the output directory already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteFileSetting {
    /// Refuse to start (the safe default: never clobber a finished run).
    #[default]
    FailIfDirectoryExists,
    /// Keep the directory and overwrite files as they are written.
    OverwriteExisting,
    /// Remove the directory and start from scratch.
    DeleteDirectoryIfExists,
}

/// Iteration range and output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub output_directory: PathBuf,

    pub overwrite_files: OverwriteFileSetting,

    /// Optional prefix for top-level output files (`<run_id>.output_plans.csv`).
    pub run_id: Option<String>,

    pub first_iteration: u32,

    /// Last iteration to run, inclusive.
    pub last_iteration: u32,

    /// Write plans every N iterations (0 disables; the first iteration is
    /// always written when enabled).
    pub write_plans_interval: u32,

    /// Write events every N iterations (0 disables).
    pub write_events_interval: u32,

    /// Write final plans, score statistics and the effective config after the
    /// last iteration.
    pub dump_data_at_end: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            output_directory:      PathBuf::from("output"),
            overwrite_files:       OverwriteFileSetting::default(),
            run_id:                None,
            first_iteration:       0,
            last_iteration:        10,
            write_plans_interval:  10,
            write_events_interval: 10,
            dump_data_at_end:      true,
        }
    }
}

impl ControllerConfig {
    /// `true` if `iteration` falls on a non-zero `interval`, counting the
    /// first iteration as always due.
    pub fn is_due(&self, iteration: u32, interval: u32) -> bool {
        interval > 0 && (iteration == self.first_iteration || iteration % interval == 0)
    }

    pub fn writes_plans(&self, iteration: u32) -> bool {
        self.is_due(iteration, self.write_plans_interval)
    }

    pub fn writes_events(&self, iteration: u32) -> bool {
        self.is_due(iteration, self.write_events_interval)
    }
}
