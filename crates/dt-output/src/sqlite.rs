//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the target directory with two
//! tables: `plans` and `score_stats`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, PlanRow, ScoreStatsRow};

/// Writes plans and score statistics to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS plans (
                 iteration   INTEGER NOT NULL,
                 person      TEXT    NOT NULL,
                 plan        INTEGER NOT NULL,
                 selected    INTEGER NOT NULL,
                 score       REAL,
                 element     INTEGER NOT NULL,
                 type        TEXT    NOT NULL,
                 label       TEXT    NOT NULL,
                 node        INTEGER,
                 end_time    INTEGER,
                 travel_time INTEGER,
                 route       TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS score_stats (
                 iteration    INTEGER PRIMARY KEY,
                 avg_executed REAL,
                 avg_worst    REAL,
                 avg_average  REAL,
                 avg_best     REAL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_plans(&mut self, rows: &[PlanRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO plans \
                 (iteration, person, plan, selected, score, element, type, label, node, end_time, travel_time, route) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.iteration,
                    row.person,
                    row.plan,
                    row.selected as i64,
                    row.score,
                    row.element,
                    row.kind,
                    row.label,
                    row.node,
                    row.end_time,
                    row.travel_time,
                    row.route,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_score_stats(&mut self, row: &ScoreStatsRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO score_stats (iteration, avg_executed, avg_worst, avg_average, avg_best) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![row.iteration, row.avg_executed, row.avg_worst, row.avg_average, row.avg_best],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
