//! `dt-output`: run output writers for the iterative controller.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                      |
//! |-----------|---------|----------------------------------------------------|
//! | *(none)*  | CSV     | `{prefix}plans.csv`, `{prefix}scorestats.csv`      |
//! | `sqlite`  | SQLite  | `output.db`                                        |
//!
//! Both implement [`OutputWriter`].  Events are written separately by
//! [`EventsCsvWriter`], which plugs into the events manager as a handler.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dt_output::{CsvWriter, OutputWriter, PlanRow};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"), "output_");
//! writer.write_plans(&PlanRow::from_population(10, &population))?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod events;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use events::EventsCsvWriter;
pub use row::{PlanRow, ScoreStatsRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
