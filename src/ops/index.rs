// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Maintenance of the per-intent context index.
//!
//! An edge `context -> intent` is mirrored as `intent.contexts.in`, an edge
//! `intent -> context` as `intent.contexts.out`. Every structural mutation in
//! [`crate::ops`] routes its index updates through this module.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use crate::model::{Direction, Edge, EdgeId, Graph, IntentNode, NodeId, NodeKind};

/// One mirrored relationship: `context` appears in `intent.contexts[direction]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextLink {
    pub intent: NodeId,
    pub context: NodeId,
    pub direction: Direction,
}

/// The index entry an edge from `source` to `target` implies, or `None` when the pair is
/// not an intent/context pair (or either node is unknown).
pub fn link_for(graph: &Graph, source: &NodeId, target: &NodeId) -> Option<ContextLink> {
    match (graph.node_kind(source)?, graph.node_kind(target)?) {
        (NodeKind::Context, NodeKind::Intent) => Some(ContextLink {
            intent: target.clone(),
            context: source.clone(),
            direction: Direction::In,
        }),
        (NodeKind::Intent, NodeKind::Context) => Some(ContextLink {
            intent: source.clone(),
            context: target.clone(),
            direction: Direction::Out,
        }),
        _ => None,
    }
}

/// Appends `context_id` unless it is already listed. Returns whether the list changed.
pub fn add_reference(intent: &mut IntentNode, context_id: &NodeId, direction: Direction) -> bool {
    let list = intent.contexts_mut().list_mut(direction);
    if list.contains(context_id) {
        return false;
    }
    list.push(context_id.clone());
    true
}

/// Removes the first occurrence of `context_id`. Returns whether the list changed.
pub fn remove_reference(
    intent: &mut IntentNode,
    context_id: &NodeId,
    direction: Direction,
) -> bool {
    let list = intent.contexts_mut().list_mut(direction);
    let Some(index) = list.iter().position(|id| id == context_id) else {
        return false;
    };
    list.remove(index);
    true
}

pub(crate) fn apply_link(graph: &mut Graph, link: &ContextLink) -> bool {
    graph
        .intent_mut(&link.intent)
        .is_some_and(|intent| add_reference(intent, &link.context, link.direction))
}

pub(crate) fn drop_link(graph: &mut Graph, link: &ContextLink) -> bool {
    graph
        .intent_mut(&link.intent)
        .is_some_and(|intent| remove_reference(intent, &link.context, link.direction))
}

/// Repairs the index after `deleted_node_id` and its `removed_edges` left the graph.
///
/// Only surviving intents carry an index, so an edge whose surviving end is a context needs
/// no work. Returns the intents whose index changed.
pub fn reindex_after_node_deletion(
    graph: &mut Graph,
    deleted_node_id: &NodeId,
    removed_edges: &[Edge],
) -> Vec<NodeId> {
    let mut touched = Vec::new();
    for edge in removed_edges {
        let Some(survivor) = edge.other_end(deleted_node_id) else {
            continue;
        };
        let direction = if edge.source() == deleted_node_id {
            Direction::In
        } else {
            Direction::Out
        };
        let Some(intent) = graph.intent_mut(survivor) else {
            continue;
        };
        if remove_reference(intent, deleted_node_id, direction) && !touched.contains(survivor) {
            touched.push(survivor.clone());
        }
    }
    touched
}

/// A breach of the graph invariants found by [`check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DuplicateNodeId {
        node_id: NodeId,
    },
    DuplicateEdgeId {
        edge_id: EdgeId,
    },
    DanglingEdge {
        edge_id: EdgeId,
        node_id: NodeId,
    },
    SelfLoop {
        edge_id: EdgeId,
    },
    SameKindEdge {
        edge_id: EdgeId,
        kind: NodeKind,
    },
    DuplicatePair {
        edge_id: EdgeId,
        existing_edge_id: EdgeId,
    },
    UnknownContext {
        intent_id: NodeId,
        context_id: NodeId,
        direction: Direction,
    },
    DuplicateIndexEntry {
        intent_id: NodeId,
        context_id: NodeId,
        direction: Direction,
    },
    StaleIndexEntry {
        intent_id: NodeId,
        context_id: NodeId,
        direction: Direction,
    },
    MissingIndexEntry {
        edge_id: EdgeId,
        intent_id: NodeId,
        context_id: NodeId,
        direction: Direction,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::DuplicateEdgeId { edge_id } => write!(f, "duplicate edge id {edge_id}"),
            Self::DanglingEdge { edge_id, node_id } => {
                write!(f, "edge {edge_id} references unknown node {node_id}")
            }
            Self::SelfLoop { edge_id } => write!(f, "edge {edge_id} is a self-loop"),
            Self::SameKindEdge { edge_id, kind } => {
                write!(f, "edge {edge_id} joins two nodes of kind {kind:?}")
            }
            Self::DuplicatePair {
                edge_id,
                existing_edge_id,
            } => write!(
                f,
                "edge {edge_id} joins the same nodes as edge {existing_edge_id}"
            ),
            Self::UnknownContext {
                intent_id,
                context_id,
                direction,
            } => write!(
                f,
                "intent {intent_id} lists {context_id} in contexts.{} but it is not a context node",
                direction_key(*direction)
            ),
            Self::DuplicateIndexEntry {
                intent_id,
                context_id,
                direction,
            } => write!(
                f,
                "intent {intent_id} lists {context_id} more than once in contexts.{}",
                direction_key(*direction)
            ),
            Self::StaleIndexEntry {
                intent_id,
                context_id,
                direction,
            } => write!(
                f,
                "intent {intent_id} lists {context_id} in contexts.{} without a backing edge",
                direction_key(*direction)
            ),
            Self::MissingIndexEntry {
                edge_id,
                intent_id,
                context_id,
                direction,
            } => write!(
                f,
                "edge {edge_id} is not mirrored: intent {intent_id} lacks {context_id} in contexts.{}",
                direction_key(*direction)
            ),
        }
    }
}

pub(crate) fn direction_key(direction: Direction) -> &'static str {
    match direction {
        Direction::In => "in",
        Direction::Out => "out",
    }
}

/// Lists every invariant breach in `graph`. An empty result means the edge set and all
/// context indices agree.
pub fn check_consistency(graph: &Graph) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut kinds = BTreeMap::<&NodeId, NodeKind>::new();
    for node in graph.nodes() {
        if kinds.insert(node.id(), node.kind()).is_some() {
            violations.push(Violation::DuplicateNodeId {
                node_id: node.id().clone(),
            });
        }
    }

    let mut edge_ids = HashSet::<&EdgeId>::new();
    let mut pairs = BTreeMap::<(&NodeId, &NodeId), &EdgeId>::new();
    let mut backed = BTreeSet::<ContextLink>::new();

    for edge in graph.edges() {
        let edge_id = edge.id();
        if !edge_ids.insert(edge_id) {
            violations.push(Violation::DuplicateEdgeId {
                edge_id: edge_id.clone(),
            });
        }

        let (source, target) = (edge.source(), edge.target());
        if source == target {
            violations.push(Violation::SelfLoop {
                edge_id: edge_id.clone(),
            });
            continue;
        }

        let mut dangling = false;
        for endpoint in [source, target] {
            if !kinds.contains_key(endpoint) {
                dangling = true;
                violations.push(Violation::DanglingEdge {
                    edge_id: edge_id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
        if dangling {
            continue;
        }

        let pair = if source < target {
            (source, target)
        } else {
            (target, source)
        };
        if let Some(existing) = pairs.get(&pair) {
            violations.push(Violation::DuplicatePair {
                edge_id: edge_id.clone(),
                existing_edge_id: (*existing).clone(),
            });
            continue;
        }
        pairs.insert(pair, edge_id);

        let Some(link) = link_for(graph, source, target) else {
            violations.push(Violation::SameKindEdge {
                edge_id: edge_id.clone(),
                kind: kinds[source],
            });
            continue;
        };

        let mirrored = graph
            .intent(&link.intent)
            .is_some_and(|intent| intent.contexts().contains(link.direction, &link.context));
        if !mirrored {
            violations.push(Violation::MissingIndexEntry {
                edge_id: edge_id.clone(),
                intent_id: link.intent.clone(),
                context_id: link.context.clone(),
                direction: link.direction,
            });
        }
        backed.insert(link);
    }

    for node in graph.nodes() {
        let Some(intent) = node.as_intent() else {
            continue;
        };
        for direction in [Direction::In, Direction::Out] {
            let mut seen = BTreeSet::<&NodeId>::new();
            for context_id in intent.contexts().get(direction) {
                if !seen.insert(context_id) {
                    violations.push(Violation::DuplicateIndexEntry {
                        intent_id: intent.id().clone(),
                        context_id: context_id.clone(),
                        direction,
                    });
                    continue;
                }
                if kinds.get(context_id) != Some(&NodeKind::Context) {
                    violations.push(Violation::UnknownContext {
                        intent_id: intent.id().clone(),
                        context_id: context_id.clone(),
                        direction,
                    });
                    continue;
                }
                let link = ContextLink {
                    intent: intent.id().clone(),
                    context: context_id.clone(),
                    direction,
                };
                if !backed.contains(&link) {
                    violations.push(Violation::StaleIndexEntry {
                        intent_id: intent.id().clone(),
                        context_id: context_id.clone(),
                        direction,
                    });
                }
            }
        }
    }

    violations
}

/// What [`rederive`] changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepairReport {
    pub dropped_edges: Vec<EdgeId>,
    pub reindexed_intents: Vec<NodeId>,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_edges.is_empty() && self.reindexed_intents.is_empty()
    }
}

/// Rebuilds every context index from the edge set.
///
/// Edges that cannot be mirrored are dropped first: duplicate ids, dangling endpoints,
/// self-loops, same-kind pairs, and any later edge joining an already joined pair. Each
/// intent's lists are then rebuilt in edge order.
pub fn rederive(graph: &mut Graph) -> RepairReport {
    let mut report = RepairReport::default();

    let mut edge_ids = HashSet::<EdgeId>::new();
    let mut pairs = HashSet::<(NodeId, NodeId)>::new();
    let mut links = Vec::<ContextLink>::new();
    let mut dropped = HashSet::<usize>::new();

    for (index, edge) in graph.edges().iter().enumerate() {
        let (source, target) = (edge.source(), edge.target());
        let pair = if source < target {
            (source.clone(), target.clone())
        } else {
            (target.clone(), source.clone())
        };
        let link = (source != target)
            .then(|| link_for(graph, source, target))
            .flatten();
        match link {
            Some(link) if !pairs.contains(&pair) && !edge_ids.contains(edge.id()) => {
                pairs.insert(pair);
                edge_ids.insert(edge.id().clone());
                links.push(link);
            }
            _ => {
                dropped.insert(index);
                report.dropped_edges.push(edge.id().clone());
            }
        }
    }

    if !dropped.is_empty() {
        let mut index = 0usize;
        graph.retain_edges(|_| {
            let keep = !dropped.contains(&index);
            index += 1;
            keep
        });
    }

    for intent in graph.intents_mut() {
        let intent_id = intent.id().clone();
        let before = intent.contexts().clone();
        intent.contexts_mut().clear();
        for link in links.iter().filter(|link| link.intent == intent_id) {
            add_reference(intent, &link.context, link.direction);
        }
        if intent.contexts() != &before {
            report.reindexed_intents.push(intent_id);
        }
    }

    report
}
