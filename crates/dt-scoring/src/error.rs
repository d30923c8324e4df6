use thiserror::Error;

use dt_core::AgentId;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scores requested before scoring was finished")]
    NotFinished,

    #[error("no scoring function for {0}")]
    UnknownAgent(AgentId),
}

pub type ScoringResult<T> = Result<T, ScoringError>;
