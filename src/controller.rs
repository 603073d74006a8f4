//! High-level controller for scene editor applications.
//!
//! The [`SceneController`] owns a [`Scene`] and everything a canvas needs
//! around it: edge mode, selection, node dragging, palette placement and
//! model synchronization. Raw pointer events go in; the scene and the bound
//! models come out updated.
//!
//! # Example
//!
//! ```ignore
//! use grenmlin_scene::{NodeKind, SceneController};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = SceneController::new();
//!
//!     let nodes = Rc::new(VecModel::<NodeItem>::default());
//!     ctrl.bind_node_model(nodes.clone(), |row| NodeItem { id: row.id, label: row.label.clone(), x: row.x, y: row.y });
//!     window.set_nodes(ModelRc::from(nodes));
//!
//!     window.on_pointer_pressed(ctrl.pointer_pressed_callback());
//!     window.on_pointer_moved(ctrl.pointer_moved_callback());
//!     window.on_pointer_released(ctrl.pointer_released_callback());
//!     window.on_edge_mode_toggled(ctrl.edge_mode_toggled_callback());
//!     window.on_add_gene(ctrl.add_node_callback(NodeKind::Normal));
//!     window.on_delete_selected(ctrl.delete_selected_callback());
//!
//!     window.on_compute_preview_path(ctrl.preview_path_callback());
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::config::{PaletteConfig, SceneConfig};
use crate::document::GraphDocument;
use crate::edge::{EdgeKey, EdgeMetadata};
use crate::error::{Result, SceneError};
use crate::geometry::{Point, Region};
use crate::models::{EdgeRow, NodeRow, SceneModels};
use crate::network::RegulatoryNetwork;
use crate::node::{NodeId, NodeKind, NodeParams};
use crate::scene::Scene;
use crate::selection::{SceneItem, SelectionManager};
use crate::state::{CancelReason, InteractionEvent};
use slint::{SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Next label number and position for one palette column.
#[derive(Debug, Clone, Copy)]
struct PaletteColumn {
    counter: u32,
    next: Point,
}

impl PaletteColumn {
    fn new(origin: Point) -> Self {
        Self { counter: 1, next: origin }
    }
}

#[derive(Debug, Clone, Copy)]
struct PaletteState {
    input: PaletteColumn,
    gene: PaletteColumn,
    output: PaletteColumn,
}

impl PaletteState {
    fn new(config: &PaletteConfig) -> Self {
        Self {
            input: PaletteColumn::new(config.origin(NodeKind::Input)),
            gene: PaletteColumn::new(config.origin(NodeKind::Normal)),
            output: PaletteColumn::new(config.origin(NodeKind::Output)),
        }
    }

    fn column(&self, kind: NodeKind) -> PaletteColumn {
        match kind {
            NodeKind::Input => self.input,
            NodeKind::Normal => self.gene,
            NodeKind::Output => self.output,
        }
    }

    fn column_mut(&mut self, kind: NodeKind) -> &mut PaletteColumn {
        match kind {
            NodeKind::Input => &mut self.input,
            NodeKind::Normal => &mut self.gene,
            NodeKind::Output => &mut self.output,
        }
    }
}

/// Controller that routes pointer input into a [`Scene`] and keeps the UI in sync.
///
/// In edge mode, presses on a node start an edge drag that snaps to nearby
/// nodes. Outside edge mode, presses select nodes and edges and dragging moves
/// every selected node.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct SceneController {
    scene: Rc<RefCell<Scene>>,
    selection: Rc<RefCell<SelectionManager>>,
    models: Rc<RefCell<SceneModels>>,
    palette_config: Rc<PaletteConfig>,
    palette: Rc<RefCell<PaletteState>>,
    edge_mode: Rc<RefCell<bool>>,
    /// Last pointer position of a node drag, if one is in progress
    node_drag: Rc<RefCell<Option<Point>>>,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneController {
    /// Create a controller over an empty scene with default settings.
    pub fn new() -> Self {
        Self::from_parts(Scene::new(), PaletteConfig::default())
    }

    pub fn with_config(config: SceneConfig, palette: PaletteConfig) -> Result<Self> {
        Ok(Self::from_parts(Scene::with_config(config)?, palette))
    }

    /// Wrap an existing scene, e.g. one built with a custom validator.
    pub fn from_scene(scene: Scene) -> Self {
        Self::from_parts(scene, PaletteConfig::default())
    }

    fn from_parts(scene: Scene, palette_config: PaletteConfig) -> Self {
        Self {
            scene: Rc::new(RefCell::new(scene)),
            selection: Rc::new(RefCell::new(SelectionManager::new())),
            models: Rc::new(RefCell::new(SceneModels::new())),
            palette: Rc::new(RefCell::new(PaletteState::new(&palette_config))),
            palette_config: Rc::new(palette_config),
            edge_mode: Rc::new(RefCell::new(false)),
            node_drag: Rc::new(RefCell::new(None)),
        }
    }

    /// Get access to the scene.
    pub fn scene(&self) -> Rc<RefCell<Scene>> {
        self.scene.clone()
    }

    /// Get access to the selection.
    pub fn selection(&self) -> Rc<RefCell<SelectionManager>> {
        self.selection.clone()
    }

    pub fn edge_mode(&self) -> bool {
        *self.edge_mode.borrow()
    }

    pub fn is_dragging_node(&self) -> bool {
        self.node_drag.borrow().is_some()
    }

    // === Models ===

    pub fn bind_node_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&NodeRow) -> P + 'static,
    {
        self.models.borrow_mut().bind_nodes(model, constructor);
        self.refresh();
    }

    pub fn bind_edge_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&EdgeRow) -> P + 'static,
    {
        self.models.borrow_mut().bind_edges(model, constructor);
        self.refresh();
    }

    /// Push the scene into the bound models.
    pub fn refresh(&self) {
        self.models.borrow().sync(&self.scene.borrow());
    }

    // === Edge mode ===

    /// Switch edge mode on or off. Switching off cancels a drag in progress.
    pub fn set_edge_mode(&self, enabled: bool) -> InteractionEvent {
        *self.edge_mode.borrow_mut() = enabled;
        *self.node_drag.borrow_mut() = None;
        info!(enabled, "edge mode toggled");
        if enabled {
            return InteractionEvent::Ignored;
        }
        let event = self.scene.borrow_mut().cancel_drag();
        self.refresh();
        event
    }

    pub fn toggle_edge_mode(&self) -> bool {
        let enabled = !self.edge_mode();
        self.set_edge_mode(enabled);
        enabled
    }

    // === Palette ===

    /// Add a node from the palette.
    ///
    /// Nodes are labelled `I1`, `G1`, `O1`, ... per kind and stacked in their
    /// kind's column.
    pub fn add_palette_node(&self, kind: NodeKind) -> Result<NodeId> {
        let column = self.palette.borrow().column(kind);
        let label = format!("{}{}", kind.label_prefix(), column.counter);
        let position = column.next;

        let id = self.scene.borrow_mut().add_node(kind, label, position)?;

        {
            let mut palette = self.palette.borrow_mut();
            let column = palette.column_mut(kind);
            column.counter += 1;
            column.next = column.next.offset(0.0, self.palette_config.spacing);
        }

        self.refresh();
        Ok(id)
    }

    /// Add a node at an explicit position with an explicit label.
    pub fn add_node_at(&self, kind: NodeKind, label: &str, x: f32, y: f32) -> Result<NodeId> {
        let id = self.scene.borrow_mut().add_node(kind, label, Point::new(x, y))?;
        self.refresh();
        Ok(id)
    }

    // === Pointer handling ===

    /// Handle a pointer press at scene coordinates.
    pub fn pointer_pressed(&self, x: f32, y: f32, shift_held: bool) -> InteractionEvent {
        let point = Point::new(x, y);
        if self.edge_mode() {
            let event = self.scene.borrow_mut().begin_edge_at(point);
            self.refresh();
            return event;
        }

        let hit = self.item_at(x, y);
        {
            let mut selection = self.selection.borrow_mut();
            match hit {
                // Grabbing part of a multi-selection drags the whole group
                Some(SceneItem::Node(id)) if !shift_held && selection.contains(id) => {}
                Some(item) => selection.handle_interaction(item, shift_held),
                None if !shift_held => selection.clear(),
                None => {}
            }
        }

        let grabbed = match hit {
            Some(SceneItem::Node(id)) => self.selection.borrow().contains(id),
            _ => false,
        };
        *self.node_drag.borrow_mut() = grabbed.then_some(point);
        InteractionEvent::Ignored
    }

    /// Handle a pointer move at scene coordinates.
    pub fn pointer_moved(&self, x: f32, y: f32) -> InteractionEvent {
        let point = Point::new(x, y);
        if self.edge_mode() {
            let event = self.scene.borrow_mut().update_drag_at(point);
            self.refresh();
            return event;
        }

        let Some(last) = *self.node_drag.borrow() else {
            return InteractionEvent::Ignored;
        };
        let (dx, dy) = (point.x - last.x, point.y - last.y);
        {
            let selected: Vec<NodeId> = self.selection.borrow().nodes().collect();
            let mut scene = self.scene.borrow_mut();
            for id in selected {
                if let Some(position) = scene.node(id).map(|node| node.position()) {
                    scene.move_node(id, position.offset(dx, dy));
                }
            }
        }
        *self.node_drag.borrow_mut() = Some(point);
        self.refresh();
        InteractionEvent::Ignored
    }

    /// Handle a pointer release at scene coordinates.
    pub fn pointer_released(&self, x: f32, y: f32) -> InteractionEvent {
        if self.edge_mode() {
            let event = self.scene.borrow_mut().commit_or_cancel_drag_at(Point::new(x, y));
            if let InteractionEvent::EdgeCreated(key) = &event {
                info!(edge = %key, "edge created by drag");
            }
            self.refresh();
            return event;
        }
        *self.node_drag.borrow_mut() = None;
        InteractionEvent::Ignored
    }

    /// What a click or double-click at scene coordinates lands on. Nodes win over edges.
    pub fn item_at(&self, x: f32, y: f32) -> Option<SceneItem> {
        let scene = self.scene.borrow();
        let point = Point::new(x, y);
        scene
            .node_at(point)
            .map(SceneItem::Node)
            .or_else(|| scene.edge_at(point).map(SceneItem::Edge))
    }

    /// Replace the selection with everything in a rubber-band box.
    pub fn select_in_box(&self, x: f32, y: f32, width: f32, height: f32) -> usize {
        let region = Region::new(x, y, width, height);
        let items: Vec<SceneItem> = {
            let scene = self.scene.borrow();
            scene
                .nodes_in_region(region)
                .into_iter()
                .map(SceneItem::Node)
                .chain(scene.edges_in_region(region).into_iter().map(SceneItem::Edge))
                .collect()
        };
        let count = items.len();
        self.selection.borrow_mut().replace_selection(items);
        count
    }

    /// SVG path of the rubber-band line for the edge being dragged (empty when idle).
    pub fn preview_path(&self) -> SharedString {
        self.scene.borrow().preview_path().unwrap_or_default().into()
    }

    // === Deletion ===

    /// Delete every selected node (with its edges) and every selected edge.
    ///
    /// Returns the event for a drag that was cancelled because its source went
    /// away, `Ignored` otherwise.
    pub fn delete_selected(&self) -> InteractionEvent {
        let edges: Vec<EdgeKey> = self.selection.borrow().edges().collect();
        {
            let mut scene = self.scene.borrow_mut();
            for key in &edges {
                scene.delete_edge(key.source, key.target);
            }
        }
        let event = self.delete_selected_nodes();
        self.selection.borrow_mut().clear();
        self.refresh();
        event
    }

    /// Delete the selected nodes and the edges attached to them.
    pub fn delete_selected_nodes(&self) -> InteractionEvent {
        let nodes: Vec<NodeId> = self.selection.borrow().nodes().collect();
        let mut event = InteractionEvent::Ignored;
        {
            let mut scene = self.scene.borrow_mut();
            let source = scene.interaction_state().pending_source();
            for id in &nodes {
                if scene.delete_node(*id) && source == Some(*id) {
                    event = InteractionEvent::DragCancelled(CancelReason::SourceRemoved);
                }
            }
            debug!(count = nodes.len(), "selected nodes deleted");
        }
        self.prune_selection();
        self.refresh();
        event
    }

    /// Delete the selected edges, leaving nodes alone.
    pub fn delete_selected_edges(&self) -> usize {
        let edges: Vec<EdgeKey> = self.selection.borrow().edges().collect();
        let removed = {
            let mut scene = self.scene.borrow_mut();
            edges
                .iter()
                .filter(|key| scene.delete_edge(key.source, key.target))
                .count()
        };
        self.prune_selection();
        self.refresh();
        removed
    }

    /// Drop selected items that no longer exist.
    fn prune_selection(&self) {
        let scene = self.scene.borrow();
        self.selection.borrow_mut().retain(|item| match item {
            SceneItem::Node(id) => scene.node(*id).is_some(),
            SceneItem::Edge(key) => scene.edge(key.source, key.target).is_some(),
        });
    }

    // === Editing ===

    pub fn rename_node(&self, id: NodeId, label: &str) -> Result<()> {
        let found = self.scene.borrow_mut().rename_node(id, label)?;
        if !found {
            return Err(SceneError::NotFound(id));
        }
        self.refresh();
        Ok(())
    }

    pub fn set_node_params(&self, id: NodeId, params: NodeParams) -> Result<()> {
        if !self.scene.borrow_mut().set_node_params(id, params)? {
            return Err(SceneError::NotFound(id));
        }
        Ok(())
    }

    pub fn edit_edge(&self, source: NodeId, target: NodeId, metadata: EdgeMetadata) -> bool {
        let edited = self.scene.borrow_mut().edit_edge(source, target, metadata);
        if edited {
            self.refresh();
        }
        edited
    }

    // === Documents ===

    pub fn export_document(&self) -> GraphDocument {
        self.scene.borrow().export()
    }

    /// Replace the scene with `document`, resetting selection and palette counters.
    pub fn import_document(&self, document: &GraphDocument) -> Result<()> {
        self.scene.borrow_mut().import(document)?;
        self.selection.borrow_mut().clear();
        *self.palette.borrow_mut() = PaletteState::new(&self.palette_config);
        *self.node_drag.borrow_mut() = None;
        self.refresh();
        Ok(())
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_document().to_json()
    }

    pub fn import_json(&self, json: &str) -> Result<()> {
        let document = GraphDocument::from_json(json).map_err(|err| SceneError::InvalidImport(err.to_string()))?;
        self.import_document(&document)
    }

    /// Remove everything and start the palette columns over.
    pub fn clear(&self) {
        self.scene.borrow_mut().clear();
        self.selection.borrow_mut().clear();
        *self.palette.borrow_mut() = PaletteState::new(&self.palette_config);
        *self.node_drag.borrow_mut() = None;
        self.refresh();
    }

    pub fn network(&self) -> RegulatoryNetwork {
        RegulatoryNetwork::from_scene(&self.scene.borrow())
    }

    // === Callback factories ===

    /// Returns a callback for `pointer-pressed(x, y, shift)`.
    pub fn pointer_pressed_callback(&self) -> impl Fn(f32, f32, bool) {
        let ctrl = self.clone();
        move |x, y, shift| {
            ctrl.pointer_pressed(x, y, shift);
        }
    }

    /// Returns a callback for `pointer-moved(x, y)`.
    pub fn pointer_moved_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.pointer_moved(x, y);
        }
    }

    /// Returns a callback for `pointer-released(x, y)`.
    pub fn pointer_released_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.pointer_released(x, y);
        }
    }

    /// Returns a callback for `edge-mode-toggled(enabled)`.
    pub fn edge_mode_toggled_callback(&self) -> impl Fn(bool) {
        let ctrl = self.clone();
        move |enabled| {
            ctrl.set_edge_mode(enabled);
        }
    }

    /// Returns a callback that adds a palette node of `kind` and yields its id (0 on failure).
    pub fn add_node_callback(&self, kind: NodeKind) -> impl Fn() -> i32 {
        let ctrl = self.clone();
        move || match ctrl.add_palette_node(kind) {
            Ok(id) => id.0,
            Err(err) => {
                warn!(%kind, error = %err, "palette node not added");
                0
            }
        }
    }

    /// Returns a callback for `delete-selected`.
    pub fn delete_selected_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.delete_selected();
        }
    }

    /// Returns a callback for `rename-node(id, label)` reporting whether the label was accepted.
    pub fn rename_node_callback(&self) -> impl Fn(i32, SharedString) -> bool {
        let ctrl = self.clone();
        move |id, label| ctrl.rename_node(NodeId(id), label.as_str()).is_ok()
    }

    /// Returns a callback for `compute-preview-path`.
    pub fn preview_path_callback(&self) -> impl Fn() -> SharedString {
        let scene = self.scene.clone();
        move || scene.borrow().preview_path().unwrap_or_default().into()
    }
}
