//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, PlanRow, ScoreStatsRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    /// Write a batch of plan element rows.
    fn write_plans(&mut self, rows: &[PlanRow]) -> OutputResult<()>;

    /// Write one score statistics row.
    fn write_score_stats(&mut self, row: &ScoreStatsRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
