use thiserror::Error;

use dt_core::{AgentId, DtError};

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("population parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Core(#[from] DtError),

    #[error("unknown node {0:?}")]
    UnknownNode(String),

    #[error("unknown facility {0:?}")]
    UnknownFacility(String),

    #[error("malformed plan for person {person:?}: {reason}")]
    MalformedPlan { person: String, reason: String },

    #[error("{0} has no plan")]
    NoPlan(AgentId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
