use std::path::PathBuf;

use thiserror::Error;

use dt_population::PopulationError;
use dt_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A structural mutation was attempted after [`Scenario::lock`](crate::Scenario::lock).
    #[error("scenario is locked: cannot {operation}")]
    StateLocked { operation: &'static str },

    #[error("scenario element {0:?} already exists")]
    DuplicateElement(String),

    #[error("scenario element {0:?} has no value")]
    NullElement(String),

    #[error("required input file {0} not found")]
    MissingInput(PathBuf),

    #[error("network input error: {0}")]
    Network(String),

    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
