// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use dialograph::format::{deserialize, from_json_str, serialize, to_json_string};
use dialograph::model::{Direction, Graph, NodeKind, Position, SequentialSource};
use dialograph::ops::{check_consistency, GraphStore};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    CreateNode { intent: bool, x: f64, y: f64 },
    DeleteNode(usize),
    CreateEdge(usize, usize),
    DeleteEdge(usize),
    SwapEdge(usize, usize, usize),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (any::<bool>(), -500i32..500, -500i32..500).prop_map(|(intent, x, y)| {
            Action::CreateNode {
                intent,
                x: f64::from(x),
                y: f64::from(y),
            }
        }),
        1 => (0..32usize).prop_map(Action::DeleteNode),
        4 => (0..32usize, 0..32usize).prop_map(|(a, b)| Action::CreateEdge(a, b)),
        1 => (0..32usize).prop_map(Action::DeleteEdge),
        2 => (0..32usize, 0..32usize, 0..32usize)
            .prop_map(|(e, a, b)| Action::SwapEdge(e, a, b)),
    ]
}

/// Runs `actions` against a fresh store, resolving indices against the current graph so
/// most actions name live objects. Rejections are expected and ignored.
fn run(actions: &[Action]) -> GraphStore {
    let mut store = GraphStore::new(Graph::new(), SequentialSource::new("p-"));
    for action in actions {
        let nodes: Vec<_> = store.graph().nodes().iter().map(|n| n.id().clone()).collect();
        let edges: Vec<_> = store.graph().edges().iter().map(|e| e.id().clone()).collect();
        let node_at = |index: usize| nodes.get(index % nodes.len().max(1)).cloned();
        let edge_at = |index: usize| edges.get(index % edges.len().max(1)).cloned();

        match *action {
            Action::CreateNode { intent, x, y } => {
                let kind = if intent { NodeKind::Intent } else { NodeKind::Context };
                store.create_node(kind, Some(Position::new(x, y)));
            }
            Action::DeleteNode(index) => {
                if let Some(node_id) = node_at(index) {
                    store.delete_node(&node_id);
                }
            }
            Action::CreateEdge(a, b) => {
                if let (Some(source), Some(target)) = (node_at(a), node_at(b)) {
                    let _ = store.create_edge(&source, &target);
                }
            }
            Action::DeleteEdge(index) => {
                if let Some(edge_id) = edge_at(index) {
                    store.delete_edge(&edge_id);
                }
            }
            Action::SwapEdge(e, a, b) => {
                if let (Some(edge_id), Some(source), Some(target)) =
                    (edge_at(e), node_at(a), node_at(b))
                {
                    let _ = store.swap_edge_endpoint(&edge_id, &source, &target);
                }
            }
        }
    }
    store
}

proptest! {
    #[test]
    fn prop_public_operations_preserve_every_invariant(
        actions in proptest::collection::vec(action(), 0..80)
    ) {
        let store = run(&actions);
        let graph = store.graph();

        prop_assert_eq!(check_consistency(graph), Vec::new());

        for edge in graph.edges() {
            prop_assert_ne!(edge.source(), edge.target());
            let source = graph.node_kind(edge.source());
            let target = graph.node_kind(edge.target());
            prop_assert!(source.is_some() && target.is_some());
            prop_assert_ne!(source, target);
        }

        for node in graph.nodes() {
            let Some(intent) = node.as_intent() else { continue };
            for direction in [Direction::In, Direction::Out] {
                for context_id in intent.contexts().get(direction) {
                    let (source, target) = match direction {
                        Direction::In => (context_id, intent.id()),
                        Direction::Out => (intent.id(), context_id),
                    };
                    let backing = graph
                        .edges()
                        .iter()
                        .filter(|edge| edge.source() == source && edge.target() == target)
                        .count();
                    prop_assert_eq!(backing, 1);
                }
            }
            for edge in graph.edges_touching(intent.id()) {
                let listed = intent.contexts().contains(Direction::In, edge.source())
                    || intent.contexts().contains(Direction::Out, edge.target());
                prop_assert!(listed);
            }
        }
    }

    #[test]
    fn prop_serialize_round_trips(actions in proptest::collection::vec(action(), 0..60)) {
        let store = run(&actions);
        let graph = store.snapshot();

        let restored = deserialize(serialize(&graph)).expect("deserialize");
        prop_assert_eq!(&restored, &graph);

        let json = to_json_string(&graph).expect("to json");
        let reparsed = deserialize(from_json_str(&json).expect("parse")).expect("deserialize");
        prop_assert_eq!(&reparsed, &graph);
    }
}
