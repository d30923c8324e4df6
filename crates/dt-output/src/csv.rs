//! CSV output backend.
//!
//! Writes up to two files in the target directory, each opened (and given
//! its header row) on first use:
//! - `{prefix}plans.csv`
//! - `{prefix}scorestats.csv`

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, PlanRow, ScoreStatsRow};

const PLANS_HEADER: [&str; 12] = [
    "iteration", "person", "plan", "selected", "score", "element", "type", "label", "node",
    "end_time", "travel_time", "route",
];

const SCORESTATS_HEADER: [&str; 5] = ["iteration", "avg_executed", "avg_worst", "avg_average", "avg_best"];

/// Writes plans and score statistics to CSV files.
pub struct CsvWriter {
    dir:      PathBuf,
    prefix:   String,
    plans:    Option<Writer<File>>,
    stats:    Option<Writer<File>>,
    finished: bool,
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvWriter {
    /// A writer for files named `{prefix}plans.csv` and
    /// `{prefix}scorestats.csv` in `dir`.  Nothing is created until the
    /// first write.
    pub fn new(dir: &Path, prefix: impl Into<String>) -> Self {
        Self { dir: dir.to_path_buf(), prefix: prefix.into(), plans: None, stats: None, finished: false }
    }

    pub fn plans_path(&self) -> PathBuf {
        self.dir.join(format!("{}plans.csv", self.prefix))
    }

    pub fn score_stats_path(&self) -> PathBuf {
        self.dir.join(format!("{}scorestats.csv", self.prefix))
    }

    fn open(path: PathBuf, header: &[&str]) -> OutputResult<Writer<File>> {
        let mut w = Writer::from_path(path)?;
        w.write_record(header)?;
        Ok(w)
    }
}

impl OutputWriter for CsvWriter {
    fn write_plans(&mut self, rows: &[PlanRow]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        let w = match self.plans.take() {
            Some(w) => w,
            None => Self::open(self.plans_path(), &PLANS_HEADER)?,
        };
        let w = self.plans.insert(w);
        for row in rows {
            w.write_record(&[
                row.iteration.to_string(),
                row.person.clone(),
                row.plan.to_string(),
                (row.selected as u8).to_string(),
                opt(row.score),
                row.element.to_string(),
                row.kind.to_owned(),
                row.label.clone(),
                opt(row.node),
                opt(row.end_time),
                opt(row.travel_time),
                row.route.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_score_stats(&mut self, row: &ScoreStatsRow) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        let w = match self.stats.take() {
            Some(w) => w,
            None => Self::open(self.score_stats_path(), &SCORESTATS_HEADER)?,
        };
        let w = self.stats.insert(w);
        w.write_record(&[
            row.iteration.to_string(),
            opt(row.avg_executed),
            opt(row.avg_worst),
            opt(row.avg_average),
            opt(row.avg_best),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        for w in [&mut self.plans, &mut self.stats].into_iter().flatten() {
            w.flush()?;
        }
        Ok(())
    }
}
