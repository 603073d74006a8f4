//! Directed edges between nodes.
//!
//! An edge stores only the ids of its endpoints plus editable metadata. All of
//! its geometry is derived from the endpoint positions each time it is asked
//! for, so a moved node never leaves a stale edge behind.

use crate::geometry::{distance_to_segment, Point, Region};
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an edge: its ordered endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeKey {
    pub const fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// Sign of a regulatory interaction. Serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Regulation {
    #[default]
    Activation,
    Repression,
}

impl From<Regulation> for i8 {
    fn from(r: Regulation) -> i8 {
        match r {
            Regulation::Activation => 1,
            Regulation::Repression => -1,
        }
    }
}

impl TryFrom<i8> for Regulation {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Regulation::Activation),
            -1 => Ok(Regulation::Repression),
            other => Err(format!("edge type should be either -1 or 1, got {}", other)),
        }
    }
}

/// Editable data carried alongside an edge's endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeMetadata {
    #[serde(rename = "type")]
    pub regulation: Regulation,
    /// Dissociation constant
    #[serde(rename = "Kd", alias = "kd")]
    pub kd: f64,
    /// Hill coefficient
    #[serde(rename = "n")]
    pub hill: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for EdgeMetadata {
    fn default() -> Self {
        Self {
            regulation: Regulation::Activation,
            kd: 1.0,
            hill: 1.0,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    key: EdgeKey,
    pub metadata: EdgeMetadata,
}

impl Edge {
    pub(crate) fn new(key: EdgeKey, metadata: EdgeMetadata) -> Self {
        Self { key, metadata }
    }

    pub fn key(&self) -> EdgeKey {
        self.key
    }

    pub fn source(&self) -> NodeId {
        self.key.source
    }

    pub fn target(&self) -> NodeId {
        self.key.target
    }

    /// Bounding box of both endpoint centers, grown by the arrowhead allowance.
    ///
    /// `source` and `target` must be this edge's endpoints.
    pub fn bounding_region(&self, source: &Node, target: &Node, arrow_size: f32) -> Region {
        debug_assert_eq!(source.id(), self.key.source);
        debug_assert_eq!(target.id(), self.key.target);
        Region::from_corners(source.position(), target.position()).expanded(arrow_size)
    }

    /// Capsule hit-test along the source→target segment.
    pub fn contains_point(&self, p: Point, source: &Node, target: &Node, hit_width: f32) -> bool {
        distance_to_segment(p, source.position(), target.position()) <= hit_width
    }
}
