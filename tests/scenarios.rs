// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use dialograph::config::EditorConfig;
use dialograph::format::{
    serialize, validate_value, ImportOptions, IntegrityMode, ValidationError,
};
use dialograph::model::{default_graph, Graph, NodeId, NodeKind, SequentialSource};
use dialograph::ops::{check_consistency, ErrorCategory, GraphRef, GraphStore, Op};
use dialograph::store::{GraphSource, MemorySource, StoreError, VersionLog};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn store() -> GraphStore {
    GraphStore::new(Graph::new(), SequentialSource::new("s-"))
}

fn ins(store: &GraphStore, intent: &NodeId) -> Vec<NodeId> {
    store
        .graph()
        .intent(intent)
        .expect("intent")
        .contexts()
        .input()
        .to_vec()
}

#[rstest]
fn scenario_a_context_to_intent_edge_is_mirrored(mut store: GraphStore) {
    let c1 = store.create_node(NodeKind::Context, None);
    let i1 = store.create_node(NodeKind::Intent, None);

    assert!(store.create_edge(&c1, &i1).is_ok());
    assert_eq!(ins(&store, &i1), vec![c1]);
}

#[rstest]
fn scenario_b_self_edge_is_rejected(mut store: GraphStore) {
    let i1 = store.create_node(NodeKind::Intent, None);
    let before = store.snapshot();

    let err = store.create_edge(&i1, &i1).expect_err("self edge");

    assert_eq!(err.category(), ErrorCategory::IllegalEdge);
    assert_eq!(store.graph(), &before);
}

#[rstest]
fn scenario_c_intent_to_intent_edge_is_rejected(mut store: GraphStore) {
    let i1 = store.create_node(NodeKind::Intent, None);
    let i2 = store.create_node(NodeKind::Intent, None);

    let err = store.create_edge(&i1, &i2).expect_err("same kind");

    assert_eq!(err.category(), ErrorCategory::IllegalEdge);
    assert!(store.graph().edges().is_empty());
}

#[rstest]
fn scenario_d_reattaching_moves_the_reference(mut store: GraphStore) {
    let c1 = store.create_node(NodeKind::Context, None);
    let i1 = store.create_node(NodeKind::Intent, None);
    let i2 = store.create_node(NodeKind::Intent, None);
    let edge = store.create_edge(&c1, &i1).expect("edge");

    store.swap_edge_endpoint(&edge, &c1, &i2).expect("swap");

    assert!(ins(&store, &i1).is_empty());
    assert_eq!(ins(&store, &i2), vec![c1]);
}

#[test]
fn scenario_e_graphs_without_edges_are_rejected() {
    let options = ImportOptions::default();

    let err = validate_value(json!({"nodes": [], "edges": []}), &options).expect_err("empty");
    assert!(matches!(err, ValidationError::MissingNodes));

    let err = validate_value(
        json!({"nodes": [{"id": "n", "type": "contextNode", "title": "n"}], "edges": []}),
        &options,
    )
    .expect_err("edgeless");
    assert!(matches!(err, ValidationError::MissingEdges));
}

#[rstest]
fn repeated_connect_is_idempotent(mut store: GraphStore) {
    let c1 = store.create_node(NodeKind::Context, None);
    let i1 = store.create_node(NodeKind::Intent, None);

    store.create_edge(&c1, &i1).expect("edge");
    let once = store.snapshot();
    let _ = store.create_edge(&c1, &i1);

    assert_eq!(store.graph(), &once);
}

#[rstest]
fn deleting_the_context_leaves_no_trace(mut store: GraphStore) {
    let context = store.create_node(NodeKind::Context, None);
    let intent = store.create_node(NodeKind::Intent, None);
    store.create_edge(&context, &intent).expect("edge");

    store.delete_node(&context);

    assert!(!ins(&store, &intent).contains(&context));
    assert!(store.graph().edges().is_empty());
}

#[test]
fn first_launch_starts_from_the_default_graph_and_persists_edits() {
    let source = MemorySource::new();
    let mut store =
        GraphStore::load_or_default(&source, SequentialSource::new("s-"), EditorConfig::default())
            .expect("load");
    assert_eq!(store.graph(), &default_graph());

    let awaiting_name = NodeId::new("ctx-awaiting-name").expect("id");
    let ask_size = store.create_node(NodeKind::Intent, None);
    store.create_edge(&awaiting_name, &ask_size).expect("edge");
    store.save(&source).expect("save");

    let reopened =
        GraphStore::load_or_default(&source, SequentialSource::new("s-"), EditorConfig::default())
            .expect("reload");
    assert_eq!(reopened.graph(), store.graph());
    assert_eq!(reopened.rev(), 0);
}

#[test]
fn a_cleared_session_reopens_from_the_default_graph() {
    let source = MemorySource::new();
    let mut store = GraphStore::new(default_graph(), SequentialSource::new("s-"));
    store.clear();
    store.save(&source).expect("save");

    let reopened =
        GraphStore::load_or_default(&source, SequentialSource::new("s-"), EditorConfig::default())
            .expect("reopen");

    assert_eq!(reopened.graph(), &default_graph());
}

#[test]
fn a_saved_graph_without_edges_reopens_as_saved() {
    let source = MemorySource::new();
    let mut store = GraphStore::new(Graph::new(), SequentialSource::new("s-"));
    store.create_node(NodeKind::Context, None);
    store.create_node(NodeKind::Intent, None);
    store.save(&source).expect("save");

    let reopened =
        GraphStore::load_or_default(&source, SequentialSource::new("s-"), EditorConfig::default())
            .expect("reopen");

    assert_eq!(reopened.graph(), store.graph());
    assert!(reopened.graph().edges().is_empty());
}

#[test]
fn a_corrupted_save_is_refused_under_verify() {
    let source = MemorySource::with_json(
        json!({
            "nodes": [
                {"id": "c1", "type": "contextNode"},
                {"id": "i1", "type": "intentNode", "contexts": {"in": [], "out": []}}
            ],
            "edges": [{"id": "e1", "source": "c1", "target": "i1", "type": "basicEdge"}]
        })
        .to_string(),
    );
    let verify = EditorConfig::default()
        .with_import(ImportOptions::default().with_integrity(IntegrityMode::Verify));

    let err = GraphStore::load_or_default(&source, SequentialSource::default(), verify)
        .expect_err("inconsistent");
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::Inconsistent { .. })
    ));

    let repair = EditorConfig::default()
        .with_import(ImportOptions::default().with_integrity(IntegrityMode::Repair));
    let store = GraphStore::load_or_default(&source, SequentialSource::default(), repair)
        .expect("repaired");
    assert!(check_consistency(store.graph()).is_empty());
}

#[test]
fn rejected_import_keeps_the_current_graph() {
    let mut store = GraphStore::new(default_graph(), SequentialSource::default());

    let err = store
        .import_json_str(r#"{"nodes": [{"id": "x", "type": "contextNode"}], "edges": []}"#)
        .expect_err("edgeless");

    assert!(matches!(err, ValidationError::MissingEdges));
    assert_eq!(store.graph(), &default_graph());
    assert_eq!(store.rev(), 0);
}

#[test]
fn accepted_import_replaces_the_graph_and_reports_the_change() {
    let mut store = GraphStore::new(Graph::new(), SequentialSource::default());
    store.take_delta();

    store
        .import(serialize(&default_graph()))
        .expect("import");

    assert_eq!(store.graph(), &default_graph());
    assert_eq!(store.rev(), 1);
    let delta = store.take_delta();
    assert_eq!(delta.added.len(), 6);
    assert!(delta.removed.is_empty());
}

#[test]
fn batch_built_against_an_old_rev_is_refused() {
    let mut store = GraphStore::new(default_graph(), SequentialSource::new("s-"));
    let base = store.rev();
    store.create_node(NodeKind::Context, None);

    let err = store
        .apply(
            base,
            &[Op::DeleteNode {
                node_id: NodeId::new("ctx-start").expect("id"),
            }],
        )
        .expect_err("stale");
    assert_eq!(err.category(), ErrorCategory::Conflict);

    let result = store
        .apply(
            store.rev(),
            &[Op::DeleteNode {
                node_id: NodeId::new("ctx-start").expect("id"),
            }],
        )
        .expect("fresh");
    assert!(result
        .delta
        .removed
        .contains(&GraphRef::Node(NodeId::new("ctx-start").expect("id"))));
    assert!(check_consistency(store.graph()).is_empty());
}

#[test]
fn saved_versions_can_be_restored() {
    let mut store = GraphStore::new(default_graph(), SequentialSource::new("s-"));
    let mut log = VersionLog::new();
    let first = log.record(store.graph());

    store.delete_node(&NodeId::new("intent-welcome").expect("id"));
    log.record(store.graph());

    let restored = log
        .restore(first, &store.config().import)
        .expect("restore");
    store.replace_graph(restored);
    assert_eq!(store.graph(), &default_graph());
}

#[test]
fn saving_through_a_source_writes_the_exchange_format() {
    let store = GraphStore::new(default_graph(), SequentialSource::default());
    let source = MemorySource::new();

    store.save(&source).expect("save");

    let saved: serde_json::Value =
        serde_json::from_str(&source.contents().expect("saved")).expect("json");
    assert_eq!(saved["edges"][1]["type"], "basicEdge");
    assert_eq!(source.load().expect("load"), Some(serialize(&default_graph())));
}
