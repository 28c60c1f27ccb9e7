// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{EdgeId, NodeId};
use super::node::{IntentNode, Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeKind {
    #[default]
    Basic,
}

impl EdgeKind {
    pub fn as_type_str(self) -> &'static str {
        match self {
            Self::Basic => "basicEdge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    kind: EdgeKind,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            kind: EdgeKind::Basic,
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }

    /// True if both edges join the same two nodes, in either direction.
    pub fn same_pair(&self, source: &NodeId, target: &NodeId) -> bool {
        (&self.source == source && &self.target == target)
            || (&self.source == target && &self.target == source)
    }

    /// The endpoint opposite `node_id`, if `node_id` is an endpoint at all.
    pub fn other_end(&self, node_id: &NodeId) -> Option<&NodeId> {
        if &self.source == node_id {
            Some(&self.target)
        } else if &self.target == node_id {
            Some(&self.source)
        } else {
            None
        }
    }

    pub(crate) fn set_endpoints(&mut self, source: NodeId, target: NodeId) {
        self.source = source;
        self.target = target;
    }
}

/// The canonical intent graph.
///
/// Node and edge order is insertion order and is preserved through serialization. Read
/// access is public; structural mutation is reserved to the crate so the context index
/// cannot drift from the edge set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from already materialized parts without checking anything. Imports
    /// go through the validator instead.
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn node_kind(&self, node_id: &NodeId) -> Option<NodeKind> {
        self.node(node_id).map(Node::kind)
    }

    pub fn intent(&self, node_id: &NodeId) -> Option<&IntentNode> {
        self.node(node_id).and_then(Node::as_intent)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id() == edge_id)
    }

    pub fn contains_edge(&self, edge_id: &EdgeId) -> bool {
        self.edge(edge_id).is_some()
    }

    /// The edge joining `a` and `b` in either direction.
    pub fn edge_between(&self, a: &NodeId, b: &NodeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.same_pair(a, b))
    }

    pub fn edges_touching<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |edge| edge.touches(node_id))
    }

    pub(crate) fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == node_id)
    }

    pub(crate) fn intent_mut(&mut self, node_id: &NodeId) -> Option<&mut IntentNode> {
        self.node_mut(node_id).and_then(Node::as_intent_mut)
    }

    pub(crate) fn intents_mut(&mut self) -> impl Iterator<Item = &mut IntentNode> {
        self.nodes.iter_mut().filter_map(Node::as_intent_mut)
    }

    pub(crate) fn edge_mut(&mut self, edge_id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|edge| edge.id() == edge_id)
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub(crate) fn remove_node(&mut self, node_id: &NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|node| node.id() == node_id)?;
        Some(self.nodes.remove(index))
    }

    pub(crate) fn remove_edge(&mut self, edge_id: &EdgeId) -> Option<Edge> {
        let index = self.edges.iter().position(|edge| edge.id() == edge_id)?;
        Some(self.edges.remove(index))
    }

    /// Removes every edge touching `node_id` and returns them in their former order.
    pub(crate) fn remove_edges_touching(&mut self, node_id: &NodeId) -> Vec<Edge> {
        let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|edge| edge.touches(node_id));
        self.edges = kept;
        removed
    }

    pub(crate) fn retain_edges(&mut self, keep: impl FnMut(&Edge) -> bool) {
        self.edges.retain(keep);
    }
}
