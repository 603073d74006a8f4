//! Edge-creation state machine types.
//!
//! ```text
//!            pointer-down on node
//!   Idle ───────────────────────────▶ Dragging { source }
//!    ▲                                    │  pointer-move: re-snap
//!    │   pointer-up: commit or cancel     │
//!    └────────────────────────────────────┘
//! ```
//!
//! Idle is the only rest state. Cancelling is a transition back to Idle, not
//! a state of its own.

use crate::edge::EdgeKey;
use crate::error::EdgeRejection;
use crate::geometry::Point;
use crate::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A new edge is being dragged out of `source`
    Dragging {
        source: NodeId,
        /// Last pointer position seen during the drag
        pointer: Point,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// The node the pending edge starts at, if a drag is in progress
    pub fn pending_source(&self) -> Option<NodeId> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Dragging { source, .. } => Some(*source),
        }
    }
}

/// Why a drag ended without creating an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// Released with no node within snapping distance
    NoTarget,
    /// The edge was rejected by validation (duplicate, self-loop, ...)
    Rejected(EdgeRejection),
    /// The source node was deleted during the drag
    SourceRemoved,
    /// The host cancelled the drag explicitly
    Aborted,
}

/// What a pointer event did to the scene. Hosts use this for visual feedback.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// The event had no effect in the current state
    Ignored,
    /// A drag started at `source`
    DragStarted { source: NodeId },
    /// The snap candidate after a pointer move; `None` means no node in range
    SnapPreview { target: Option<NodeId> },
    /// The drag ended and created an edge
    EdgeCreated(EdgeKey),
    /// The drag ended without creating an edge
    DragCancelled(CancelReason),
}
