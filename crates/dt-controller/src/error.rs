use std::path::PathBuf;

use dt_config::ConfigError;
use dt_events::EventsError;
use dt_mobsim::MobsimError;
use dt_output::OutputError;
use dt_replanning::ReplanningError;
use dt_scenario::ScenarioError;
use dt_scoring::ScoringError;
use thiserror::Error;

/// Anything that aborts a run.  Errors from listeners and the mobsim pass
/// through unchanged; whatever an aborted iteration already changed stays.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("mobsim failed: {0}")]
    Mobsim(#[from] MobsimError),

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("replanning failed: {0}")]
    Replanning(#[from] ReplanningError),

    #[error("output failed: {0}")]
    Output(#[from] OutputError),

    #[error(transparent)]
    Events(#[from] EventsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output directory {0} already exists and is not empty")]
    OutputDirectoryExists(PathBuf),

    /// An extension listener was added after the first iteration started.
    #[error("listener registration is closed once the first iteration has started")]
    RegistrationClosed,

    #[error("controller has already run")]
    AlreadyRun,

    /// Failure reported by an extension listener.
    #[error("listener {listener} failed: {message}")]
    Listener { listener: String, message: String },
}

pub type ControllerResult<T> = Result<T, ControllerError>;
