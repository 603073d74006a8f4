//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use grenmlin_scene::{CancelReason, EdgeKey, InteractionEvent, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

/// Tracks interaction events for testing.
///
/// Each field records one kind of event with its payload.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// Source of every drag that started
    pub drag_started: Rc<RefCell<Vec<NodeId>>>,
    /// Every snap preview, including `None` for "nothing in range"
    pub snap_previews: Rc<RefCell<Vec<Option<NodeId>>>>,
    /// Edges committed by a drag
    pub edge_created: Rc<RefCell<Vec<EdgeKey>>>,
    /// Reasons of cancelled drags
    pub drag_cancelled: Rc<RefCell<Vec<CancelReason>>>,
    /// Count of events that had no effect
    pub ignored: Rc<RefCell<usize>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event.
    pub fn record(&self, event: InteractionEvent) {
        match event {
            InteractionEvent::Ignored => *self.ignored.borrow_mut() += 1,
            InteractionEvent::DragStarted { source } => self.drag_started.borrow_mut().push(source),
            InteractionEvent::SnapPreview { target } => self.snap_previews.borrow_mut().push(target),
            InteractionEvent::EdgeCreated(key) => self.edge_created.borrow_mut().push(key),
            InteractionEvent::DragCancelled(reason) => self.drag_cancelled.borrow_mut().push(reason),
        }
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.drag_started.borrow_mut().clear();
        self.snap_previews.borrow_mut().clear();
        self.edge_created.borrow_mut().clear();
        self.drag_cancelled.borrow_mut().clear();
        *self.ignored.borrow_mut() = 0;
    }
}
