use dt_core::AgentId;
use dt_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplanningError {
    #[error("unknown replanning strategy {0:?}")]
    UnknownStrategy(String),

    #[error("routing failed for {agent}: {source}")]
    Routing {
        agent:  AgentId,
        #[source]
        source: SpatialError,
    },

    #[error("{0} has no plan")]
    NoPlan(AgentId),
}

pub type ReplanningResult<T> = Result<T, ReplanningError>;
