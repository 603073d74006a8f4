//! Error types for scene commands.
//!
//! Commands that reference a missing id are treated as idempotent no-ops and
//! report that through their return value (`bool`, empty list). The variants
//! here cover mutations that were actually rejected.

use crate::node::{NodeId, NodeKind};
use thiserror::Error;

/// Convenience alias for results of scene commands.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Reasons an edge was rejected by the validation framework
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeRejection {
    /// Source and target are the same node and self-loops are disabled
    #[error("Cannot connect a node to itself")]
    SelfLoop,
    /// An edge with the same ordered endpoints already exists
    #[error("Edge already exists")]
    Duplicate,
    /// One of the endpoints is not part of the scene
    #[error("Node {0} not found")]
    UnknownEndpoint(NodeId),
    /// Custom validation failure
    #[error("{0}")]
    Custom(String),
}

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Invalid edge: {0}")]
    InvalidEdge(#[from] EdgeRejection),

    #[error("Node {0} not found")]
    NotFound(NodeId),

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    #[error("Node label must not be empty")]
    InvalidLabel,

    #[error("Parameters do not apply to {kind} node {id}")]
    KindMismatch { id: NodeId, kind: NodeKind },

    #[error("Node id space exhausted")]
    IdSpaceExhausted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
