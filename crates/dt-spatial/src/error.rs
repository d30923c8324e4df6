//! Spatial-subsystem error type.

use thiserror::Error;

use dt_core::{EdgeId, NodeId};

/// Errors produced by `dt-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("{0} not found in network")]
    NodeNotFound(NodeId),

    #[error("{0} not found in network")]
    LinkNotFound(EdgeId),

    #[error("{link} does not start where the previous link ends")]
    DisconnectedPath { link: EdgeId },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
