//! Graph vertices: identity, kind, label, position and kind-specific parameters.

use crate::error::{Result, SceneError};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable node identifier assigned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of a node. Fixed when the node is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Externally driven species
    Input,
    /// Species produced by genes, subject to degradation
    Output,
    /// A gene
    #[serde(alias = "gene")]
    Normal,
}

impl NodeKind {
    /// Label prefix used when the palette names new nodes (`I1`, `O1`, `G1`).
    pub fn label_prefix(self) -> &'static str {
        match self {
            NodeKind::Input => "I",
            NodeKind::Output => "O",
            NodeKind::Normal => "G",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Normal => "normal",
        })
    }
}

/// How a gene combines its regulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicType {
    #[default]
    And,
    Or,
}

pub const DEFAULT_ALPHA: f64 = 10.0;
pub const DEFAULT_DEGRADATION_RATE: f64 = 0.1;

/// Kind-specific node parameters.
///
/// The variant always matches the node's [`NodeKind`]; [`Node::set_params`]
/// rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeParams {
    Input,
    Output { degradation_rate: f64 },
    Normal { alpha: f64, logic: LogicType },
}

impl NodeParams {
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Input => NodeParams::Input,
            NodeKind::Output => NodeParams::Output {
                degradation_rate: DEFAULT_DEGRADATION_RATE,
            },
            NodeKind::Normal => NodeParams::Normal {
                alpha: DEFAULT_ALPHA,
                logic: LogicType::And,
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeParams::Input => NodeKind::Input,
            NodeParams::Output { .. } => NodeKind::Output,
            NodeParams::Normal { .. } => NodeKind::Normal,
        }
    }
}

/// Circular hit shape of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeShape {
    pub radius: f32,
}

impl NodeShape {
    /// Shape for a node of `kind` drawn with `diameter` at rendering `scale`.
    ///
    /// All kinds currently share the same footprint.
    pub fn for_kind(kind: NodeKind, diameter: f32, scale: f32) -> Self {
        let base = match kind {
            NodeKind::Input | NodeKind::Output | NodeKind::Normal => diameter,
        };
        Self {
            radius: base * scale * 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    label: String,
    position: Point,
    params: NodeParams,
}

impl Node {
    /// Create a node with the default parameters for its kind.
    pub fn new(id: NodeId, kind: NodeKind, label: impl Into<String>, position: Point) -> Result<Self> {
        let label = normalize_label(label.into())?;
        Ok(Self {
            id,
            kind,
            label,
            position,
            params: NodeParams::default_for(kind),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Center of the node in scene coordinates
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn params(&self) -> NodeParams {
        self.params
    }

    /// Replace the label. Surrounding whitespace is trimmed; an empty result is rejected.
    pub fn rename(&mut self, label: impl Into<String>) -> Result<()> {
        self.label = normalize_label(label.into())?;
        Ok(())
    }

    pub fn set_params(&mut self, params: NodeParams) -> Result<()> {
        if params.kind() != self.kind {
            return Err(SceneError::KindMismatch {
                id: self.id,
                kind: self.kind,
            });
        }
        self.params = params;
        Ok(())
    }

    // Position changes go through `Scene::move_node` so incident edges are reported.
    pub(crate) fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    pub fn contains_point(&self, p: Point, shape: NodeShape) -> bool {
        self.position.distance_sq(p) <= shape.radius * shape.radius
    }
}

fn normalize_label(label: String) -> Result<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(SceneError::InvalidLabel);
    }
    if trimmed.len() == label.len() {
        Ok(label)
    } else {
        Ok(trimmed.to_string())
    }
}
