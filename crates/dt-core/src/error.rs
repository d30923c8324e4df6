//! Parse failures for the core value types.
//!
//! The plans loader in `dt-population` wraps `DtError` in its own enum, so a
//! bad mode or clock time in a CSV row surfaces as `PopulationError::Core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtError {
    #[error("unknown transport mode {0:?}")]
    UnknownMode(String),

    #[error("invalid time {0:?}: expected seconds or hh:mm[:ss]")]
    InvalidTime(String),
}

pub type DtResult<T> = Result<T, DtError>;
