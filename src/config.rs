//! Scene and palette configuration.
//!
//! Both structs deserialize with `#[serde(default)]`, so a configuration file
//! only needs to name the values it overrides:
//!
//! ```
//! use grenmlin_scene::SceneConfig;
//!
//! let config = SceneConfig::from_json_str(r#"{ "snap_radius": 15.0 }"#).unwrap();
//! assert_eq!(config.snap_radius, 15.0);
//! assert_eq!(config.node_diameter, 50.0);
//! ```

use crate::error::{Result, SceneError};
use crate::geometry::Point;
use crate::node::{NodeKind, NodeShape};
use serde::{Deserialize, Serialize};

/// Geometry and validation settings of a [`Scene`](crate::Scene).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Maximum distance from a node center at which a drag snaps to it
    pub snap_radius: f32,
    /// Node circle diameter before scaling
    pub node_diameter: f32,
    /// Rendering scale applied to node shapes
    pub scale: f32,
    /// Arrowhead length; also the margin added to edge bounding regions
    pub arrow_size: f32,
    /// Half-angle of the arrowhead in degrees
    pub arrow_angle_deg: f32,
    /// Capsule half-width used when hit-testing edges
    pub edge_hit_width: f32,
    /// Whether an edge may start and end on the same node
    pub allow_self_loops: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            snap_radius: 40.0,
            node_diameter: 50.0,
            scale: 1.0,
            arrow_size: 12.0,
            arrow_angle_deg: 30.0,
            edge_hit_width: 6.0,
            allow_self_loops: false,
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_snap_radius(mut self, radius: f32) -> Self {
        self.snap_radius = radius;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_self_loops(mut self, allowed: bool) -> Self {
        self.allow_self_loops = allowed;
        self
    }

    /// Check that every value is usable for geometry computations.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("snap_radius", self.snap_radius),
            ("arrow_size", self.arrow_size),
            ("edge_hit_width", self.edge_hit_width),
            ("arrow_angle_deg", self.arrow_angle_deg),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SceneError::InvalidConfig(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [("node_diameter", self.node_diameter), ("scale", self.scale)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SceneError::InvalidConfig(format!(
                    "{} must be a finite positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn node_shape(&self, kind: NodeKind) -> NodeShape {
        NodeShape::for_kind(kind, self.node_diameter, self.scale)
    }
}

/// Where the controller places nodes added from the palette.
///
/// Each kind fills its own column, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub input_origin: Point,
    pub gene_origin: Point,
    pub output_origin: Point,
    /// Vertical distance between consecutive nodes of a column
    pub spacing: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            input_origin: Point::new(50.0, 50.0),
            gene_origin: Point::new(200.0, 50.0),
            output_origin: Point::new(400.0, 50.0),
            spacing: 60.0,
        }
    }
}

impl PaletteConfig {
    pub fn origin(&self, kind: NodeKind) -> Point {
        match kind {
            NodeKind::Input => self.input_origin,
            NodeKind::Normal => self.gene_origin,
            NodeKind::Output => self.output_origin,
        }
    }
}
