use crate::edge::EdgeKey;
use crate::node::NodeId;
use indexmap::IndexSet;
use slint::{Model, VecModel};

/// Something in the scene that can be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneItem {
    Node(NodeId),
    Edge(EdgeKey),
}

impl From<NodeId> for SceneItem {
    fn from(id: NodeId) -> Self {
        SceneItem::Node(id)
    }
}

impl From<EdgeKey> for SceneItem {
    fn from(key: EdgeKey) -> Self {
        SceneItem::Edge(key)
    }
}

/// Selected nodes and edges, kept in the order they were selected.
#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: IndexSet<SceneItem>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on an item based on interaction modifiers
    pub fn handle_interaction(&mut self, item: impl Into<SceneItem>, shift_held: bool) {
        let item = item.into();
        if shift_held {
            if !self.selected.shift_remove(&item) {
                self.selected.insert(item);
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(&item) {
                return;
            }
            self.selected.clear();
            self.selected.insert(item);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the current selection, e.g. with the result of a box selection
    pub fn replace_selection<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = SceneItem>,
    {
        self.selected.clear();
        self.selected.extend(items);
    }

    pub fn contains(&self, item: impl Into<SceneItem>) -> bool {
        self.selected.contains(&item.into())
    }

    /// Keep only the items for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&SceneItem) -> bool) {
        self.selected.retain(|item| keep(item));
    }

    /// Selected items in selection order
    pub fn iter(&self) -> impl Iterator<Item = SceneItem> + '_ {
        self.selected.iter().copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selected.iter().filter_map(|item| match item {
            SceneItem::Node(id) => Some(*id),
            SceneItem::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.selected.iter().filter_map(|item| match item {
            SceneItem::Edge(key) => Some(*key),
            SceneItem::Node(_) => None,
        })
    }

    /// Sync the selected node ids to a Slint VecModel
    pub fn sync_to_model(&self, model: &VecModel<i32>) {
        while model.row_count() > 0 {
            model.remove(0);
        }
        for id in self.nodes() {
            model.push(id.0);
        }
    }

    /// Select the node ids held by a Slint model (e.g. after box selection in the UI)
    pub fn sync_from_model(&mut self, model: &dyn Model<Data = i32>) {
        self.selected.clear();
        for i in 0..model.row_count() {
            if let Some(id) = model.row_data(i) {
                self.selected.insert(SceneItem::Node(NodeId(id)));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
