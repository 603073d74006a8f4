//! Render models for the host UI.
//!
//! [`SceneModels`] turns scene state into flat rows and pushes them into
//! Slint `VecModel`s. The scene itself never touches Slint; call
//! [`sync`](SceneModels::sync) after mutating it.
//!
//! # Example
//!
//! ```ignore
//! let models = SceneModels::new();
//! let nodes = Rc::new(VecModel::<NodeItem>::default());
//! models.bind_nodes(nodes.clone(), |row| NodeItem {
//!     id: row.id,
//!     label: row.label.clone(),
//!     x: row.x,
//!     y: row.y,
//!     highlighted: row.pinned,
//! });
//! window.set_nodes(ModelRc::from(nodes));
//!
//! // after every change
//! models.sync(&scene.borrow());
//! ```

use crate::edge::Regulation;
use crate::node::NodeKind;
use crate::scene::Scene;
use slint::{Model, ModelRc, SharedString, VecModel};
use std::marker::PhantomData;
use std::rc::Rc;

/// One node as the UI draws it
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub id: i32,
    pub label: SharedString,
    pub kind: NodeKind,
    /// Center
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// The node is the snap target of the drag in progress
    pub pinned: bool,
}

/// One edge as the UI draws it
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRow {
    pub source: i32,
    pub target: i32,
    /// SVG path commands for the clipped line and its arrowhead
    pub path_commands: SharedString,
    pub repression: bool,
}

/// Internal trait for auto-syncing rows to Slint models.
trait ModelSyncer<R> {
    fn sync(&self, rows: &[R]);
}

struct ConcreteModelSyncer<R, P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
    _row: PhantomData<fn(&R)>,
}

impl<R, P, F> ModelSyncer<R> for ConcreteModelSyncer<R, P, F>
where
    P: Clone + 'static,
    F: Fn(&R) -> P,
{
    fn sync(&self, rows: &[R]) {
        update_model(&self.model, rows, &self.constructor);
    }
}

/// Update rows in place, append new ones and drop the excess.
fn update_model<R, P, F>(model: &VecModel<P>, rows: &[R], constructor: F)
where
    P: Clone + 'static,
    F: Fn(&R) -> P,
{
    for (i, row) in rows.iter().enumerate() {
        let item = constructor(row);
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
    }
    while model.row_count() > rows.len() {
        model.remove(model.row_count() - 1);
    }
}

/// Keeps bound Slint models in step with a [`Scene`].
#[derive(Default)]
pub struct SceneModels {
    nodes: Option<Box<dyn ModelSyncer<NodeRow>>>,
    edges: Option<Box<dyn ModelSyncer<EdgeRow>>>,
}

impl SceneModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a model that receives one item per node, in scene order.
    pub fn bind_nodes<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&NodeRow) -> P + 'static,
    {
        self.nodes = Some(Box::new(ConcreteModelSyncer {
            model,
            constructor,
            _row: PhantomData,
        }));
    }

    /// Bind a model that receives one item per edge, in scene order.
    pub fn bind_edges<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&EdgeRow) -> P + 'static,
    {
        self.edges = Some(Box::new(ConcreteModelSyncer {
            model,
            constructor,
            _row: PhantomData,
        }));
    }

    /// Push the current scene state into every bound model.
    pub fn sync(&self, scene: &Scene) {
        if let Some(syncer) = &self.nodes {
            syncer.sync(&node_rows(scene));
        }
        if let Some(syncer) = &self.edges {
            syncer.sync(&edge_rows(scene));
        }
    }
}

pub fn node_rows(scene: &Scene) -> Vec<NodeRow> {
    let pinned = scene.pinned_node();
    scene
        .nodes()
        .map(|node| {
            let position = node.position();
            NodeRow {
                id: node.id().0,
                label: SharedString::from(node.label()),
                kind: node.kind(),
                x: position.x,
                y: position.y,
                radius: scene.node_shape(node.kind()).radius,
                pinned: pinned == Some(node.id()),
            }
        })
        .collect()
}

pub fn edge_rows(scene: &Scene) -> Vec<EdgeRow> {
    scene
        .edges()
        .iter()
        .filter_map(|edge| {
            let path = scene.edge_path(edge.key())?;
            Some(EdgeRow {
                source: edge.source().0,
                target: edge.target().0,
                path_commands: SharedString::from(path.as_str()),
                repression: edge.metadata.regulation == Regulation::Repression,
            })
        })
        .collect()
}

/// One-off model of the scene's edges, for hosts that do not keep a binding.
pub fn create_edges_model<P, F>(scene: &Scene, constructor: F) -> ModelRc<P>
where
    P: Clone + 'static,
    F: Fn(&EdgeRow) -> P,
{
    let items: Vec<P> = edge_rows(scene).iter().map(constructor).collect();
    ModelRc::from(Rc::new(VecModel::from(items)))
}
