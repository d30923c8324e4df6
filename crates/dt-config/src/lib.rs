//! `dt-config`: run configuration for the iterative controller.
//!
//! Load a run configuration from TOML to control iterations, output,
//! optional scenario containers, transit, scoring and replanning without
//! code changes.  Every group and every field has a default, so an empty
//! document is a valid configuration.
//!
//! # Example
//!
//! ```
//! use dt_config::Config;
//!
//! let config = Config::from_toml_str(r#"
//!     [controller]
//!     output_directory = "output/run1"
//!     last_iteration = 3
//!
//!     [transit]
//!     use_transit = true
//!
//!     [[scoring.activity_params]]
//!     activity_type = "home"
//!     typical_duration = 43200.0
//! "#).unwrap();
//!
//! assert_eq!(config.controller.last_iteration, 3);
//! assert!(config.transit.use_transit);
//! assert!(config.scoring.activity_params("home").is_some());
//! ```
//!
//! # Groups
//!
//! | Group          | Type                | Drives                                        |
//! |----------------|---------------------|-----------------------------------------------|
//! | `controller`   | [`ControllerConfig`] | iterations, output directory, write intervals |
//! | `scenario`     | [`ScenarioConfig`]   | households / vehicles containers              |
//! | `transit`      | [`TransitConfig`]    | transit switch and input files                |
//! | `scoring`      | [`ScoringConfig`]    | utilities, activity types, learning rate      |
//! | `replanning`   | [`ReplanningConfig`] | strategy weights, plan memory                 |
//! | `mobsim`       | [`MobsimConfig`]     | simulated end time                            |
//! | `global`       | [`GlobalConfig`]     | random seed                                   |

mod controller;
mod error;
mod scoring;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use controller::{ControllerConfig, OverwriteFileSetting};
pub use error::{ConfigError, ConfigResult};
pub use scoring::{ActivityParams, ModeParams, ScoringConfig};

/// Activity type inserted at transit stops when passengers change vehicles.
pub const TRANSIT_ACTIVITY_TYPE: &str = "pt interaction";

/// Root of the run configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub controller: ControllerConfig,
    pub scenario:   ScenarioConfig,
    pub transit:    TransitConfig,
    pub scoring:    ScoringConfig,
    pub replanning: ReplanningConfig,
    pub mobsim:     MobsimConfig,
    pub global:     GlobalConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Serializes the full configuration (defaults included) to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Sets the output directory.
    pub fn with_output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.controller.output_directory = dir.into();
        self
    }

    /// Sets first and last iteration (both inclusive).
    pub fn with_iterations(mut self, first: u32, last: u32) -> Self {
        self.controller.first_iteration = first;
        self.controller.last_iteration = last;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.global.random_seed = seed;
        self
    }
}

// ── Small groups ──────────────────────────────────────────────────────────────

/// Switches for the optional scenario containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub use_households: bool,
    pub use_vehicles:   bool,
}

/// Transit switch and input files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransitConfig {
    pub use_transit: bool,

    /// Transit vehicles file.  Transit without one still runs, with a warning.
    pub vehicles_file: Option<PathBuf>,

    pub transit_schedule_file: Option<PathBuf>,
}

/// One weighted replanning strategy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrategySettings {
    /// One of `best_score`, `exp_beta`, `keep_last_selected`, `reroute`.
    pub name:   String,
    pub weight: f64,
}

impl StrategySettings {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self { name: name.into(), weight }
    }
}

/// Replanning strategies and plan memory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplanningConfig {
    /// Plans kept per agent; the worst-scored surplus plans are removed.
    pub max_agent_plan_memory_size: usize,

    pub strategies: Vec<StrategySettings>,
}

impl Default for ReplanningConfig {
    fn default() -> Self {
        Self {
            max_agent_plan_memory_size: 5,
            strategies: vec![
                StrategySettings::new("exp_beta", 0.9),
                StrategySettings::new("reroute", 0.1),
            ],
        }
    }
}

/// Mobsim settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MobsimConfig {
    /// Simulated end of day in seconds; agents still underway become stuck.
    pub end_time: u32,
}

impl Default for MobsimConfig {
    fn default() -> Self {
        Self { end_time: 30 * 3_600 }
    }
}

/// Settings shared by every component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub random_seed: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self { random_seed: 4711 }
    }
}
