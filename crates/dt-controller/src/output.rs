//! Output directory layout.
//!
//! ```text
//! <output_directory>/
//! ├── output_plans.csv            (end of run)
//! ├── output_scorestats.csv       (end of run)
//! ├── output_config.toml          (end of run)
//! └── ITERS/
//!     ├── it.0/0.plans.csv
//!     ├── it.0/0.events.csv
//!     └── it.10/…
//! ```
//!
//! With `controller.run_id` set, every file name gets a `<run_id>.` prefix.

use std::fs;
use std::path::{Path, PathBuf};

use dt_config::{ControllerConfig, OverwriteFileSetting};
use dt_core::{Sink, SinkExt};

use crate::{ControllerError, ControllerResult};

const COMPONENT: &str = "output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectoryHierarchy {
    root:      PathBuf,
    run_id:    Option<String>,
    overwrite: OverwriteFileSetting,
}

impl OutputDirectoryHierarchy {
    pub fn new(root: impl Into<PathBuf>, run_id: Option<String>, overwrite: OverwriteFileSetting) -> Self {
        Self { root: root.into(), run_id, overwrite }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.output_directory.clone(), config.run_id.clone(), config.overwrite_files)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root and `ITERS/`, applying the overwrite policy to an
    /// existing root.  An existing but empty root counts as fresh.
    pub fn prepare(&self, sink: &Sink) -> ControllerResult<()> {
        if self.root.is_dir() && fs::read_dir(&self.root)?.next().is_some() {
            match self.overwrite {
                OverwriteFileSetting::FailIfDirectoryExists => {
                    return Err(ControllerError::OutputDirectoryExists(self.root.clone()));
                }
                OverwriteFileSetting::OverwriteExisting => {
                    sink.warn(
                        COMPONENT,
                        format!("output directory {} exists; files will be overwritten", self.root.display()),
                    );
                }
                OverwriteFileSetting::DeleteDirectoryIfExists => {
                    sink.info(COMPONENT, format!("deleting existing output directory {}", self.root.display()));
                    fs::remove_dir_all(&self.root)?;
                }
            }
        }
        fs::create_dir_all(self.iters_dir())?;
        Ok(())
    }

    fn prefix(&self) -> String {
        self.run_id.as_deref().map(|id| format!("{id}.")).unwrap_or_default()
    }

    pub fn iters_dir(&self) -> PathBuf {
        self.root.join("ITERS")
    }

    pub fn iteration_dir(&self, iteration: u32) -> PathBuf {
        self.iters_dir().join(format!("it.{iteration}"))
    }

    pub fn create_iteration_dir(&self, iteration: u32) -> ControllerResult<PathBuf> {
        let dir = self.iteration_dir(iteration);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// File-name prefix for per-iteration files: `[<run_id>.]<iteration>.`
    pub fn iteration_prefix(&self, iteration: u32) -> String {
        format!("{}{iteration}.", self.prefix())
    }

    /// `ITERS/it.N/[<run_id>.]N.<name>`
    pub fn iteration_file(&self, iteration: u32, name: &str) -> PathBuf {
        self.iteration_dir(iteration).join(format!("{}{name}", self.iteration_prefix(iteration)))
    }

    /// File-name prefix for end-of-run files: `[<run_id>.]output_`
    pub fn output_prefix(&self) -> String {
        format!("{}output_", self.prefix())
    }

    /// `<root>/[<run_id>.]output_<name>`
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}{name}", self.output_prefix()))
    }
}
