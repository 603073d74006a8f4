//! Test harness for a headless editor.
//!
//! Mirrors what a Slint host wires up: a [`SceneController`] with node and
//! edge models bound, plus helpers for simulating pointer gestures.

#![allow(dead_code)]

use super::CallbackTracker;
use grenmlin_scene::{
    EdgeKey, EdgeRow, InteractionEvent, NodeId, NodeKind, NodeRow, Point, SceneController,
};
use slint::{Model, VecModel};
use std::rc::Rc;

/// Test harness wrapping a controller and its bound models.
pub struct SceneHarness {
    pub ctrl: SceneController,
    pub nodes: Rc<VecModel<NodeRow>>,
    pub edges: Rc<VecModel<EdgeRow>>,
    pub tracker: CallbackTracker,
}

impl SceneHarness {
    /// Empty scene, edge mode off.
    pub fn new() -> Self {
        Self::with_controller(SceneController::new())
    }

    pub fn with_controller(ctrl: SceneController) -> Self {
        let nodes = Rc::new(VecModel::<NodeRow>::default());
        let edges = Rc::new(VecModel::<EdgeRow>::default());
        ctrl.bind_node_model(nodes.clone(), |row| row.clone());
        ctrl.bind_edge_model(edges.clone(), |row| row.clone());
        Self {
            ctrl,
            nodes,
            edges,
            tracker: CallbackTracker::new(),
        }
    }

    /// Two nodes, A (input) at (100, 100) and B (gene) at (400, 100).
    pub fn with_two_nodes() -> (Self, NodeId, NodeId) {
        let harness = Self::new();
        let a = harness.add_node(NodeKind::Input, "A", 100.0, 100.0);
        let b = harness.add_node(NodeKind::Normal, "B", 400.0, 100.0);
        (harness, a, b)
    }

    pub fn add_node(&self, kind: NodeKind, label: &str, x: f32, y: f32) -> NodeId {
        self.ctrl.add_node_at(kind, label, x, y).unwrap()
    }

    // === Pointer simulation ===

    pub fn press(&self, x: f32, y: f32) -> InteractionEvent {
        self.press_with_shift(x, y, false)
    }

    pub fn press_with_shift(&self, x: f32, y: f32, shift: bool) -> InteractionEvent {
        let event = self.ctrl.pointer_pressed(x, y, shift);
        self.tracker.record(event.clone());
        event
    }

    pub fn move_to(&self, x: f32, y: f32) -> InteractionEvent {
        let event = self.ctrl.pointer_moved(x, y);
        self.tracker.record(event.clone());
        event
    }

    pub fn release(&self, x: f32, y: f32) -> InteractionEvent {
        let event = self.ctrl.pointer_released(x, y);
        self.tracker.record(event.clone());
        event
    }

    /// Full press / move / release gesture.
    pub fn drag(&self, from: (f32, f32), to: (f32, f32)) -> InteractionEvent {
        self.press(from.0, from.1);
        self.move_to((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
        self.move_to(to.0, to.1);
        self.release(to.0, to.1)
    }

    /// Drag a new edge in edge mode, leaving edge mode as it was.
    pub fn drag_edge(&self, from: (f32, f32), to: (f32, f32)) -> InteractionEvent {
        let was_on = self.ctrl.edge_mode();
        self.ctrl.set_edge_mode(true);
        let event = self.drag(from, to);
        if !was_on {
            self.ctrl.set_edge_mode(false);
        }
        event
    }

    // === Model inspection ===

    pub fn node_rows(&self) -> Vec<NodeRow> {
        (0..self.nodes.row_count()).filter_map(|i| self.nodes.row_data(i)).collect()
    }

    pub fn edge_rows(&self) -> Vec<EdgeRow> {
        (0..self.edges.row_count()).filter_map(|i| self.edges.row_data(i)).collect()
    }

    pub fn node_labels(&self) -> Vec<String> {
        self.node_rows().iter().map(|row| row.label.to_string()).collect()
    }

    pub fn node_center(&self, id: NodeId) -> Option<Point> {
        self.ctrl.scene().borrow().node(id).map(|node| node.position())
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.ctrl.scene().borrow().edges().iter().map(|edge| edge.key()).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.ctrl.scene().borrow().edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.ctrl.scene().borrow().node_count()
    }

    pub fn pinned_row(&self) -> Option<i32> {
        self.node_rows().iter().find(|row| row.pinned).map(|row| row.id)
    }
}
