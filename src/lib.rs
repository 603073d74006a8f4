//! # GReNMlin Scene
//!
//! The interactive scene engine behind a gene regulatory network editor.
//! Nodes (inputs, genes, outputs) are placed on a canvas and connected by
//! directed edges that the user drags from one node to another.
//!
//! ## Features
//!
//! - **Edge drawing with snapping** - a drag from a node snaps to the nearest
//!   other node within a configurable radius and commits on release
//! - **Derived edge geometry** - edges never store positions; moving a node
//!   reports exactly the edges that need repainting
//! - **Pluggable validation** - self-loop, duplicate and endpoint rules plus
//!   custom [`EdgeValidator`]s
//! - **Slint integration** - [`SceneController`] turns pointer callbacks into
//!   scene commands and keeps `VecModel`s in sync
//! - **Documents and networks** - JSON import/export and assembly of the
//!   regulatory network a simulator consumes
//!
//! ## Quick Start
//!
//! ```
//! use grenmlin_scene::{NodeKind, Point, Scene};
//!
//! let mut scene = Scene::new();
//! let input = scene.add_node(NodeKind::Input, "I1", Point::new(50.0, 50.0)).unwrap();
//! let gene = scene.add_node(NodeKind::Normal, "G1", Point::new(200.0, 50.0)).unwrap();
//! scene.add_edge(input, gene).unwrap();
//!
//! let moved = scene.move_node(gene, Point::new(200.0, 120.0));
//! assert_eq!(moved.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`scene`] - the [`Scene`] engine and edge-creation state machine
//! - [`hit_test`] - nearest-node snapping and point/box hit-testing
//! - [`graph`] - edge validation framework
//! - [`controller`] - [`SceneController`] for Slint hosts
//! - [`document`] - [`GraphDocument`] import/export
//! - [`network`] - [`RegulatoryNetwork`] assembly

pub mod config;
pub mod controller;
pub mod document;
pub mod edge;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod models;
pub mod network;
pub mod node;
pub mod path;
pub mod scene;
pub mod selection;
pub mod state;

pub use config::{PaletteConfig, SceneConfig};
pub use controller::SceneController;
pub use document::{EdgeRecord, GraphDocument, NodeRecord};
pub use edge::{Edge, EdgeKey, EdgeMetadata, Regulation};
pub use error::{EdgeRejection, Result, SceneError};
pub use geometry::{Point, Region};
pub use graph::{
    structural_validator, CompositeValidator, EdgeValidator, EndpointsExistValidator, GraphLogic, GraphView,
    NoDuplicatesValidator, NoSelfLoopsValidator, ValidationResult,
};
pub use hit_test::{
    edges_in_selection_box, find_edge_at, find_nearest_node, find_node_at, nodes_in_selection_box, EdgeSegment,
    NodeGeometry, SimpleEdgeSegment, SimpleNodeGeometry,
};
pub use models::{EdgeRow, NodeRow, SceneModels};
pub use network::RegulatoryNetwork;
pub use node::{LogicType, Node, NodeId, NodeKind, NodeParams, NodeShape};
pub use path::{compute_edge_geometry, generate_edge_path, generate_preview_path, EdgeGeometry};
pub use scene::Scene;
pub use selection::{SceneItem, SelectionManager};
pub use state::{CancelReason, InteractionEvent, InteractionState};
