//! The scene: owner of all nodes and edges and driver of the edge-creation
//! state machine.
//!
//! Everything runs synchronously on the caller's thread. Commands that
//! reference a missing node or edge are no-ops and say so through their return
//! value; structural violations are rejected with a [`SceneError`].
//!
//! # Example
//!
//! ```
//! use grenmlin_scene::{InteractionEvent, NodeKind, Point, Scene};
//!
//! let mut scene = Scene::new();
//! let a = scene.add_node(NodeKind::Input, "A", Point::new(0.0, 0.0)).unwrap();
//! let b = scene.add_node(NodeKind::Normal, "B", Point::new(100.0, 0.0)).unwrap();
//!
//! scene.begin_edge_at(Point::new(0.0, 0.0));
//! scene.update_drag_at(Point::new(95.0, 5.0));
//! let event = scene.commit_or_cancel_drag_at(Point::new(95.0, 5.0));
//!
//! assert!(matches!(event, InteractionEvent::EdgeCreated(_)));
//! assert!(scene.has_edge(a, b));
//! ```

use crate::config::SceneConfig;
use crate::document::{EdgeRecord, GraphDocument, NodeRecord};
use crate::edge::{Edge, EdgeKey, EdgeMetadata};
use crate::error::{EdgeRejection, Result, SceneError};
use crate::geometry::{Point, Region};
use crate::graph::{structural_validator, CompositeValidator, EdgeValidator, GraphLogic, GraphView};
use crate::hit_test::{self, SimpleEdgeSegment, SimpleNodeGeometry};
use crate::node::{Node, NodeId, NodeKind, NodeParams, NodeShape};
use crate::path::{compute_edge_geometry, generate_edge_path, generate_preview_path, EdgeGeometry};
use crate::state::{CancelReason, InteractionEvent, InteractionState};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

pub struct Scene {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    state: InteractionState,
    pinned_node: Option<NodeId>,
    config: SceneConfig,
    validator: CompositeValidator,
    next_id: i32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with the default configuration.
    pub fn new() -> Self {
        Self::build(SceneConfig::default())
    }

    /// Create an empty scene after validating `config`.
    pub fn with_config(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SceneConfig) -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            state: InteractionState::Idle,
            pinned_node: None,
            validator: structural_validator(config.allow_self_loops),
            config,
            next_id: 1,
        }
    }

    /// Add a validation rule checked after the structural ones.
    pub fn with_validator<V: EdgeValidator + 'static>(mut self, validator: V) -> Self {
        self.validator = std::mem::take(&mut self.validator).add(validator);
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // === Queries ===

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edges in creation order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, source: NodeId, target: NodeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.key() == EdgeKey::new(source, target))
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        GraphLogic::duplicate_edge_exists(source, target, &self.edges)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.state
    }

    /// Node currently highlighted as the snap target of a drag
    pub fn pinned_node(&self) -> Option<NodeId> {
        self.pinned_node
    }

    pub fn node_shape(&self, kind: NodeKind) -> NodeShape {
        self.config.node_shape(kind)
    }

    /// Keys of all edges starting or ending at `id`
    pub fn incident_edges(&self, id: NodeId) -> Vec<EdgeKey> {
        GraphLogic::find_edges_connected_to_node(id, &self.edges)
    }

    fn node_geometries(&self) -> impl Iterator<Item = SimpleNodeGeometry> + '_ {
        self.nodes.values().map(move |node| SimpleNodeGeometry {
            id: node.id(),
            center: node.position(),
            radius: self.node_shape(node.kind()).radius,
        })
    }

    fn edge_segments(&self) -> impl Iterator<Item = SimpleEdgeSegment> + '_ {
        self.edges.iter().filter_map(move |edge| {
            let source = self.nodes.get(&edge.source())?;
            let target = self.nodes.get(&edge.target())?;
            Some(SimpleEdgeSegment {
                key: edge.key(),
                start: source.position(),
                end: target.position(),
            })
        })
    }

    /// Nearest node center within the snap radius, skipping `exclude`.
    ///
    /// Ties go to the node inserted first.
    pub fn find_nearest_node(&self, point: Point, exclude: &[NodeId]) -> Option<NodeId> {
        hit_test::find_nearest_node(point, self.node_geometries(), exclude, self.config.snap_radius)
    }

    /// Topmost node under `point`
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        hit_test::find_node_at(point, self.node_geometries())
    }

    /// Edge whose capsule contains `point`
    pub fn edge_at(&self, point: Point) -> Option<EdgeKey> {
        hit_test::find_edge_at(point, self.edge_segments(), self.config.edge_hit_width)
    }

    pub fn nodes_in_region(&self, region: Region) -> Vec<NodeId> {
        hit_test::nodes_in_selection_box(region, self.node_geometries())
    }

    pub fn edges_in_region(&self, region: Region) -> Vec<EdgeKey> {
        hit_test::edges_in_selection_box(region, self.edge_segments())
    }

    /// Current bounding region of an edge, computed from its endpoint positions.
    pub fn edge_region(&self, key: EdgeKey) -> Option<Region> {
        let edge = self.edge(key.source, key.target)?;
        let source = self.nodes.get(&key.source)?;
        let target = self.nodes.get(&key.target)?;
        Some(edge.bounding_region(source, target, self.config.arrow_size))
    }

    /// Current drawn geometry of an edge (clipped line plus arrowhead).
    pub fn edge_geometry(&self, key: EdgeKey) -> Option<EdgeGeometry> {
        self.edge(key.source, key.target)?;
        let source = self.nodes.get(&key.source)?;
        let target = self.nodes.get(&key.target)?;
        Some(compute_edge_geometry(
            source.position(),
            self.node_shape(source.kind()).radius,
            target.position(),
            self.node_shape(target.kind()).radius,
            self.config.arrow_size,
            self.config.arrow_angle_deg,
        ))
    }

    /// SVG path commands for an edge
    pub fn edge_path(&self, key: EdgeKey) -> Option<String> {
        self.edge_geometry(key).map(|geometry| generate_edge_path(&geometry))
    }

    /// SVG path commands for the rubber-band line of the drag in progress.
    ///
    /// The line ends at the pinned node's center when snapped, otherwise at the
    /// pointer.
    pub fn preview_path(&self) -> Option<String> {
        let InteractionState::Dragging { source, pointer } = self.state else {
            return None;
        };
        let start = self.nodes.get(&source)?.position();
        let end = self
            .pinned_node
            .and_then(|id| self.nodes.get(&id))
            .map_or(pointer, Node::position);
        Some(generate_preview_path(start, end))
    }

    // === Node commands ===

    /// Add a node and return its freshly assigned id.
    pub fn add_node(&mut self, kind: NodeKind, label: impl Into<String>, position: Point) -> Result<NodeId> {
        let id = NodeId(self.next_id);
        let next_id = self.next_id.checked_add(1).ok_or(SceneError::IdSpaceExhausted)?;
        let node = Node::new(id, kind, label, position)?;
        self.next_id = next_id;
        debug!(node = %id, %kind, label = node.label(), "node added");
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Rename a node. Returns `Ok(false)` if the node does not exist.
    pub fn rename_node(&mut self, id: NodeId, label: impl Into<String>) -> Result<bool> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Ok(false);
        };
        node.rename(label)?;
        debug!(node = %id, label = node.label(), "node renamed");
        Ok(true)
    }

    /// Replace a node's kind-specific parameters. Returns `Ok(false)` if the node does not exist.
    pub fn set_node_params(&mut self, id: NodeId, params: NodeParams) -> Result<bool> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Ok(false);
        };
        node.set_params(params)?;
        Ok(true)
    }

    /// Move a node and return the edges whose geometry changed as a result.
    ///
    /// Edge geometry is always derived from node positions, so the returned
    /// keys are what a host needs to repaint. Unknown ids return an empty list.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> Vec<EdgeKey> {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Vec::new();
        };
        node.move_to(position);
        let affected = self.incident_edges(id);
        debug!(node = %id, x = position.x, y = position.y, edges = affected.len(), "node moved");
        affected
    }

    /// Delete a node and every edge attached to it.
    ///
    /// Returns `false` if the node was already gone.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if self.nodes.shift_remove(&id).is_none() {
            return false;
        }
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.key().touches(id));
        let removed_edges = before - self.edges.len();

        if self.state.pending_source() == Some(id) {
            debug!(node = %id, "drag source deleted, cancelling drag");
            self.reset_interaction();
        } else if self.pinned_node == Some(id) {
            self.pinned_node = None;
        }

        debug!(node = %id, removed_edges, "node deleted");
        true
    }

    // === Edge commands ===

    /// Add an edge with default metadata.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<EdgeKey> {
        self.add_edge_with(source, target, EdgeMetadata::default())
    }

    /// Add an edge carrying `metadata`.
    pub fn add_edge_with(&mut self, source: NodeId, target: NodeId, metadata: EdgeMetadata) -> Result<EdgeKey> {
        Ok(self.try_add_edge(source, target, metadata)?)
    }

    fn try_add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        metadata: EdgeMetadata,
    ) -> std::result::Result<EdgeKey, EdgeRejection> {
        self.validator
            .validate(source, target, GraphView::new(&self.nodes, &self.edges))
            .into_result()?;
        let key = EdgeKey::new(source, target);
        self.edges.push(Edge::new(key, metadata));
        debug!(edge = %key, "edge added");
        Ok(key)
    }

    /// Delete the edge `source -> target`. Returns `false` if there was none.
    pub fn delete_edge(&mut self, source: NodeId, target: NodeId) -> bool {
        match GraphLogic::find_edge_index(EdgeKey::new(source, target), &self.edges) {
            Some(index) => {
                let edge = self.edges.remove(index);
                debug!(edge = %edge.key(), "edge deleted");
                true
            }
            None => false,
        }
    }

    /// Replace the metadata of `source -> target`. Returns `false` if there is no such edge.
    pub fn edit_edge(&mut self, source: NodeId, target: NodeId, metadata: EdgeMetadata) -> bool {
        let key = EdgeKey::new(source, target);
        match self.edges.iter_mut().find(|e| e.key() == key) {
            Some(edge) => {
                edge.metadata = metadata;
                true
            }
            None => false,
        }
    }

    /// Remove all nodes and edges and return to Idle.
    ///
    /// Id assignment continues from where it was.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.reset_interaction();
    }

    // === Edge-creation state machine ===

    /// Pointer pressed at `point`.
    ///
    /// On a node this starts a drag from it; on empty canvas nothing happens.
    /// A press while a drag is still open first discards that drag.
    pub fn begin_edge_at(&mut self, point: Point) -> InteractionEvent {
        if !self.state.is_idle() {
            debug!("stale drag discarded by new press");
            self.reset_interaction();
        }
        match self.node_at(point) {
            Some(source) => {
                self.state = InteractionState::Dragging { source, pointer: point };
                self.pinned_node = None;
                debug!(source = %source, "edge drag started");
                InteractionEvent::DragStarted { source }
            }
            None => InteractionEvent::Ignored,
        }
    }

    /// Pointer moved to `point`: re-run snapping against every other node.
    pub fn update_drag_at(&mut self, point: Point) -> InteractionEvent {
        let InteractionState::Dragging { source, .. } = self.state else {
            return InteractionEvent::Ignored;
        };
        self.state = InteractionState::Dragging { source, pointer: point };

        let target = self.find_nearest_node(point, &[source]);
        if target != self.pinned_node {
            debug!(?target, "snap target changed");
        }
        self.pinned_node = target;
        InteractionEvent::SnapPreview { target }
    }

    /// Pointer released at `point`.
    ///
    /// The release position is snapped like a final move. If a node is pinned
    /// and the edge passes validation the edge is created, otherwise the drag
    /// is cancelled. Either way the scene returns to Idle.
    pub fn commit_or_cancel_drag_at(&mut self, point: Point) -> InteractionEvent {
        let InteractionState::Dragging { source, .. } = self.state else {
            return InteractionEvent::Ignored;
        };
        self.update_drag_at(point);
        let pinned = self.pinned_node;
        self.reset_interaction();

        let Some(target) = pinned else {
            debug!(source = %source, "edge drag released without target");
            return InteractionEvent::DragCancelled(CancelReason::NoTarget);
        };

        match self.try_add_edge(source, target, EdgeMetadata::default()) {
            Ok(key) => InteractionEvent::EdgeCreated(key),
            Err(reason) => {
                debug!(source = %source, target = %target, %reason, "edge drag rejected");
                InteractionEvent::DragCancelled(CancelReason::Rejected(reason))
            }
        }
    }

    /// Abort the drag in progress, if any.
    pub fn cancel_drag(&mut self) -> InteractionEvent {
        if self.state.is_idle() {
            return InteractionEvent::Ignored;
        }
        self.reset_interaction();
        InteractionEvent::DragCancelled(CancelReason::Aborted)
    }

    fn reset_interaction(&mut self) {
        self.state = InteractionState::Idle;
        self.pinned_node = None;
    }

    // === Persistence boundary ===

    /// Snapshot of the graph: nodes then edges, both in scene order.
    pub fn export(&self) -> GraphDocument {
        let document = GraphDocument {
            nodes: self.nodes.values().map(NodeRecord::from_node).collect(),
            edges: self.edges.iter().map(EdgeRecord::from_edge).collect(),
        };
        info!(nodes = document.nodes.len(), edges = document.edges.len(), "scene exported");
        document
    }

    /// Replace the whole scene with `document`.
    ///
    /// The document is checked completely before anything changes: duplicate
    /// node ids, blank labels, edges to unknown nodes and edges the validator
    /// rejects all fail with [`SceneError::InvalidImport`] and leave the scene
    /// as it was.
    pub fn import(&mut self, document: &GraphDocument) -> Result<()> {
        match self.build_from(document) {
            Ok((nodes, edges, next_id)) => {
                self.nodes = nodes;
                self.edges = edges;
                self.next_id = next_id;
                self.reset_interaction();
                info!(nodes = self.nodes.len(), edges = self.edges.len(), "scene imported");
                Ok(())
            }
            Err(reason) => {
                warn!(%reason, "import rejected");
                Err(SceneError::InvalidImport(reason))
            }
        }
    }

    fn build_from(
        &self,
        document: &GraphDocument,
    ) -> std::result::Result<(IndexMap<NodeId, Node>, Vec<Edge>, i32), String> {
        let mut nodes = IndexMap::with_capacity(document.nodes.len());
        for record in &document.nodes {
            let node = record
                .to_node()
                .map_err(|err| format!("node {}: {}", record.id, err))?;
            if nodes.insert(record.id, node).is_some() {
                return Err(format!("duplicate node id {}", record.id));
            }
        }

        let mut edges: Vec<Edge> = Vec::with_capacity(document.edges.len());
        for record in &document.edges {
            self.validator
                .validate(record.source_id, record.target_id, GraphView::new(&nodes, &edges))
                .into_result()
                .map_err(|reason| format!("edge {}->{}: {}", record.source_id, record.target_id, reason))?;
            edges.push(Edge::new(
                EdgeKey::new(record.source_id, record.target_id),
                record.metadata.clone(),
            ));
        }

        let max_id = nodes.keys().map(|id| id.0).max().unwrap_or(0).max(0);
        let next_id = max_id
            .checked_add(1)
            .ok_or_else(|| "node id space exhausted".to_string())?;

        Ok((nodes, edges, next_id))
    }
}
