//! The data shape crossing the import/export boundary.
//!
//! A [`GraphDocument`] is a flat list of node records followed by edge records.
//! It is produced by [`Scene::export`](crate::Scene::export) and consumed by
//! [`Scene::import`](crate::Scene::import); JSON is the only encoding provided
//! here.
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": 1, "label": "I1", "kind": "input", "x": 50.0, "y": 50.0 },
//!     { "id": 2, "label": "G1", "kind": "normal", "x": 200.0, "y": 50.0, "alpha": 10.0, "logic": "and" }
//!   ],
//!   "edges": [
//!     { "source_id": 1, "target_id": 2, "metadata": { "type": 1, "Kd": 1.0, "n": 1.0 } }
//!   ]
//! }
//! ```

use crate::edge::{Edge, EdgeMetadata};
use crate::error::Result;
use crate::geometry::Point;
use crate::node::{LogicType, Node, NodeId, NodeKind, NodeParams, DEFAULT_ALPHA, DEFAULT_DEGRADATION_RATE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One node. Parameter fields only appear for the kinds they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<LogicType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degradation_rate: Option<f64>,
}

impl NodeRecord {
    pub fn from_node(node: &Node) -> Self {
        let position = node.position();
        let mut record = Self {
            id: node.id(),
            label: node.label().to_string(),
            kind: node.kind(),
            x: position.x,
            y: position.y,
            alpha: None,
            logic: None,
            degradation_rate: None,
        };
        match node.params() {
            NodeParams::Input => {}
            NodeParams::Output { degradation_rate } => record.degradation_rate = Some(degradation_rate),
            NodeParams::Normal { alpha, logic } => {
                record.alpha = Some(alpha);
                record.logic = Some(logic);
            }
        }
        record
    }

    /// Build the node this record describes.
    ///
    /// Missing parameters take their defaults. Parameters that do not belong to
    /// the record's kind are ignored.
    pub fn to_node(&self) -> Result<Node> {
        let mut node = Node::new(self.id, self.kind, self.label.as_str(), Point::new(self.x, self.y))?;
        node.set_params(self.params())?;
        Ok(node)
    }

    fn params(&self) -> NodeParams {
        match self.kind {
            NodeKind::Input => NodeParams::Input,
            NodeKind::Output => NodeParams::Output {
                degradation_rate: self.degradation_rate.unwrap_or(DEFAULT_DEGRADATION_RATE),
            },
            NodeKind::Normal => NodeParams::Normal {
                alpha: self.alpha.unwrap_or(DEFAULT_ALPHA),
                logic: self.logic.unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source_id: NodeId,
    pub target_id: NodeId,
    #[serde(default)]
    pub metadata: EdgeMetadata,
}

impl EdgeRecord {
    pub fn new(source_id: NodeId, target_id: NodeId) -> Self {
        Self {
            source_id,
            target_id,
            metadata: EdgeMetadata::default(),
        }
    }

    pub fn from_edge(edge: &Edge) -> Self {
        Self {
            source_id: edge.source(),
            target_id: edge.target(),
            metadata: edge.metadata.clone(),
        }
    }
}
