//! Level 5: Import & Export Tests
//!
//! Tests the persistence boundary: exporting a scene to a document, importing
//! it back through the controller, and rejecting malformed documents without
//! touching the current scene.

mod common;

use common::harness::SceneHarness;
use grenmlin_scene::{
    EdgeKey, EdgeMetadata, EdgeRecord, GraphDocument, LogicType, NodeId, NodeKind, NodeParams, NodeRecord, Point,
    Regulation, SceneError,
};

fn node_record(id: i32, label: &str, kind: NodeKind, x: f32, y: f32) -> NodeRecord {
    NodeRecord {
        id: NodeId(id),
        label: label.to_string(),
        kind,
        x,
        y,
        alpha: None,
        logic: None,
        degradation_rate: None,
    }
}

/// I1 -> G1 -> O1, ids 1, 2, 3.
fn chain_document() -> GraphDocument {
    GraphDocument {
        nodes: vec![
            node_record(1, "I1", NodeKind::Input, 50.0, 50.0),
            node_record(2, "G1", NodeKind::Normal, 200.0, 50.0),
            node_record(3, "O1", NodeKind::Output, 400.0, 50.0),
        ],
        edges: vec![
            EdgeRecord::new(NodeId(1), NodeId(2)),
            EdgeRecord::new(NodeId(2), NodeId(3)),
        ],
    }
}

#[test]
fn test_export_lists_nodes_then_edges_in_order() {
    let (harness, a, b) = SceneHarness::with_two_nodes();
    harness.drag_edge((100.0, 100.0), (400.0, 100.0));

    let document = harness.ctrl.export_document();
    let ids: Vec<NodeId> = document.nodes.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(document.edges, vec![EdgeRecord::new(a, b)]);
    assert_eq!(document.nodes[1].alpha, Some(10.0));
    assert_eq!(document.nodes[0].alpha, None);
}

#[test]
fn test_round_trip_through_controller() {
    let (harness, a, b) = SceneHarness::with_two_nodes();
    harness.drag_edge((100.0, 100.0), (400.0, 100.0));
    let metadata = EdgeMetadata {
        regulation: Regulation::Repression,
        kd: 0.5,
        hill: 2.0,
        label: None,
    };
    assert!(harness.ctrl.edit_edge(a, b, metadata.clone()));
    let exported = harness.ctrl.export_document();

    let other = SceneHarness::new();
    other.ctrl.import_document(&exported).unwrap();

    assert_eq!(other.ctrl.export_document(), exported);
    assert_eq!(other.node_labels(), vec!["A", "B"]);
    assert_eq!(other.node_center(b), Some(Point::new(400.0, 100.0)));
    assert_eq!(
        other.ctrl.scene().borrow().edge(a, b).map(|edge| edge.metadata.clone()),
        Some(metadata)
    );
    assert!(other.edge_rows()[0].repression);
}

#[test]
fn test_import_replaces_existing_scene() {
    let harness = SceneHarness::new();
    harness.add_node(NodeKind::Normal, "old", 0.0, 0.0);
    harness.ctrl.import_document(&chain_document()).unwrap();

    assert_eq!(harness.node_labels(), vec!["I1", "G1", "O1"]);
    assert_eq!(harness.edge_keys(), vec![EdgeKey::new(NodeId(1), NodeId(2)), EdgeKey::new(NodeId(2), NodeId(3))]);
    assert_eq!(harness.edge_rows().len(), 2);
}

#[test]
fn test_ids_continue_after_highest_imported_id() {
    let harness = SceneHarness::new();
    let mut document = chain_document();
    document.nodes[1].id = NodeId(40);
    document.edges = vec![EdgeRecord::new(NodeId(1), NodeId(40))];
    harness.ctrl.import_document(&document).unwrap();

    let id = harness.add_node(NodeKind::Normal, "next", 0.0, 0.0);
    assert_eq!(id, NodeId(41));
}

#[test]
fn test_highest_possible_id_exhausts_id_space() {
    let mut document = chain_document();
    document.nodes[2].id = NodeId(i32::MAX);
    document.edges = vec![EdgeRecord::new(NodeId(1), NodeId(2))];
    assert_rejected(&document, "node id space exhausted");
}

#[test]
fn test_import_resets_selection_and_palette() {
    let harness = SceneHarness::new();
    harness.ctrl.add_palette_node(NodeKind::Input).unwrap();
    harness.ctrl.add_palette_node(NodeKind::Input).unwrap();
    harness.press(50.0, 50.0);
    harness.release(50.0, 50.0);
    assert!(!harness.ctrl.selection().borrow().is_empty());

    harness.ctrl.import_document(&chain_document()).unwrap();
    assert!(harness.ctrl.selection().borrow().is_empty());

    let id = harness.ctrl.add_palette_node(NodeKind::Input).unwrap();
    let label = harness.ctrl.scene().borrow().node(id).map(|node| node.label().to_string());
    assert_eq!(label.as_deref(), Some("I1"));
}

#[test]
fn test_import_cancels_pending_drag() {
    let (harness, _, _) = SceneHarness::with_two_nodes();
    harness.ctrl.set_edge_mode(true);
    harness.press(100.0, 100.0);
    harness.move_to(390.0, 100.0);

    harness.ctrl.import_document(&chain_document()).unwrap();
    assert!(harness.ctrl.scene().borrow().interaction_state().is_idle());
    assert_eq!(harness.pinned_row(), None);
}

// ============================================================================
// Rejected documents
// ============================================================================

fn assert_rejected(document: &GraphDocument, needle: &str) {
    let harness = SceneHarness::new();
    harness.add_node(NodeKind::Input, "keep", 10.0, 10.0);

    match harness.ctrl.import_document(document) {
        Err(SceneError::InvalidImport(reason)) => {
            assert!(reason.contains(needle), "reason {:?} should mention {:?}", reason, needle)
        }
        other => panic!("expected InvalidImport, got {:?}", other),
    }
    assert_eq!(harness.node_labels(), vec!["keep"]);
    assert_eq!(harness.edge_count(), 0);
}

#[test]
fn test_duplicate_node_id_is_rejected() {
    let mut document = chain_document();
    document.nodes[2].id = NodeId(1);
    document.edges.clear();
    assert_rejected(&document, "duplicate node id 1");
}

#[test]
fn test_blank_label_is_rejected() {
    let mut document = chain_document();
    document.nodes[0].label = "   ".to_string();
    assert_rejected(&document, "node 1");
}

#[test]
fn test_edge_to_unknown_node_is_rejected() {
    let mut document = chain_document();
    document.edges.push(EdgeRecord::new(NodeId(3), NodeId(99)));
    assert_rejected(&document, "edge 3->99");
}

#[test]
fn test_duplicate_edge_is_rejected() {
    let mut document = chain_document();
    document.edges.push(EdgeRecord::new(NodeId(1), NodeId(2)));
    assert_rejected(&document, "already exists");
}

#[test]
fn test_self_loop_is_rejected_by_default() {
    let mut document = chain_document();
    document.edges.push(EdgeRecord::new(NodeId(2), NodeId(2)));
    assert_rejected(&document, "itself");
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_round_trip() {
    let harness = SceneHarness::new();
    harness.ctrl.import_document(&chain_document()).unwrap();
    harness
        .ctrl
        .set_node_params(
            NodeId(2),
            NodeParams::Normal {
                alpha: 4.0,
                logic: LogicType::Or,
            },
        )
        .unwrap();
    let json = harness.ctrl.export_json().unwrap();

    let other = SceneHarness::new();
    other.ctrl.import_json(&json).unwrap();
    assert_eq!(other.ctrl.export_document(), harness.ctrl.export_document());
    assert_eq!(
        other.ctrl.scene().borrow().node(NodeId(2)).map(|node| node.params()),
        Some(NodeParams::Normal {
            alpha: 4.0,
            logic: LogicType::Or
        })
    );
}

#[test]
fn test_json_accepts_gene_alias_and_missing_metadata() {
    let json = r#"{
        "nodes": [
            { "id": 7, "label": "X", "kind": "input", "x": 0.0, "y": 0.0 },
            { "id": 8, "label": "Y", "kind": "gene", "x": 100.0, "y": 0.0 }
        ],
        "edges": [ { "source_id": 7, "target_id": 8 } ]
    }"#;
    let harness = SceneHarness::new();
    harness.ctrl.import_json(json).unwrap();

    let scene = harness.ctrl.scene();
    let scene = scene.borrow();
    assert_eq!(scene.node(NodeId(8)).map(|node| node.kind()), Some(NodeKind::Normal));
    assert_eq!(
        scene.edge(NodeId(7), NodeId(8)).map(|edge| edge.metadata.clone()),
        Some(EdgeMetadata::default())
    );
}

#[test]
fn test_json_accepts_capitalized_kd() {
    let json = r#"{
        "nodes": [
            { "id": 1, "label": "X", "kind": "input", "x": 0.0, "y": 0.0 },
            { "id": 2, "label": "Y", "kind": "gene", "x": 100.0, "y": 0.0 }
        ],
        "edges": [ { "source_id": 1, "target_id": 2, "metadata": { "type": -1, "Kd": 5.0, "n": 2.0 } } ]
    }"#;
    let harness = SceneHarness::new();
    harness.ctrl.import_json(json).unwrap();

    let metadata = harness.ctrl.scene().borrow().edge(NodeId(1), NodeId(2)).map(|edge| edge.metadata.clone());
    assert_eq!(
        metadata,
        Some(EdgeMetadata {
            regulation: Regulation::Repression,
            kd: 5.0,
            hill: 2.0,
            label: None,
        })
    );

    let exported = harness.ctrl.export_json().unwrap();
    let other = SceneHarness::new();
    other.ctrl.import_json(&exported).unwrap();
    assert_eq!(other.ctrl.export_document(), harness.ctrl.export_document());
}

#[test]
fn test_malformed_json_is_invalid_import() {
    let harness = SceneHarness::new();
    harness.add_node(NodeKind::Input, "keep", 0.0, 0.0);

    let result = harness.ctrl.import_json("{ \"nodes\": [ { \"id\": 1 } ] }");
    assert!(matches!(result, Err(SceneError::InvalidImport(_))));
    let result = harness.ctrl.import_json("not json");
    assert!(matches!(result, Err(SceneError::InvalidImport(_))));
    assert_eq!(harness.node_labels(), vec!["keep"]);
}
