// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for intent graphs.
//!
//! [`GraphStore`] owns the canonical graph. Every mutation validates first and only then
//! touches the graph, so a rejected operation leaves it unchanged. Committed mutations
//! bump the store revision and record a coarse [`Delta`] the UI can use to refresh.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{Edge, EdgeId, Graph, IdentifierSource, Node, NodeId, NodeKind, Position};

mod graph_store;
pub mod index;
pub mod policy;

pub use graph_store::GraphStore;
pub use index::{check_consistency, rederive, ContextLink, RepairReport, Violation};

/// A non-relational node attribute. `contexts`, `id` and `type` are deliberately absent:
/// they only change through edge operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeField {
    Title(String),
    Events(Vec<String>),
    TrainingPhrases(Vec<String>),
    Action(String),
    Payload(String),
    Responses(Vec<Vec<String>>),
    Fulfillment(bool),
    IsFallback(bool),
}

impl NodeField {
    /// The attribute name as it appears in the persisted format.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Events(_) => "events",
            Self::TrainingPhrases(_) => "trainingPhrases",
            Self::Action(_) => "action",
            Self::Payload(_) => "payload",
            Self::Responses(_) => "responses",
            Self::Fulfillment(_) => "fulfillment",
            Self::IsFallback(_) => "isFallback",
        }
    }

    /// Parses a string-keyed edit coming from a form widget.
    pub fn from_name_and_value(name: &str, value: serde_json::Value) -> Result<Self, ApplyError> {
        fn parse<T: serde::de::DeserializeOwned>(
            field: &'static str,
            expected: &'static str,
            value: serde_json::Value,
        ) -> Result<T, ApplyError> {
            serde_json::from_value(value)
                .map_err(|_| ApplyError::InvalidFieldValue { field, expected })
        }

        match name {
            "title" => parse("title", "string", value).map(Self::Title),
            "events" => parse("events", "array of strings", value).map(Self::Events),
            "trainingPhrases" => {
                parse("trainingPhrases", "array of strings", value).map(Self::TrainingPhrases)
            }
            "action" => parse("action", "string", value).map(Self::Action),
            "payload" => parse("payload", "string", value).map(Self::Payload),
            "responses" => {
                parse("responses", "array of string arrays", value).map(Self::Responses)
            }
            "fulfillment" => parse("fulfillment", "boolean", value).map(Self::Fulfillment),
            "isFallback" => parse("isFallback", "boolean", value).map(Self::IsFallback),
            "contexts" | "id" | "type" => Err(ApplyError::RelationalField {
                field: name.to_owned(),
            }),
            _ => Err(ApplyError::UnknownField {
                field: name.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    CreateNode {
        kind: NodeKind,
        position: Option<Position>,
    },
    DeleteNode {
        node_id: NodeId,
    },
    UpdateNodeField {
        node_id: NodeId,
        field: NodeField,
    },
    MoveNode {
        node_id: NodeId,
        position: Position,
    },
    CreateEdge {
        source: NodeId,
        target: NodeId,
    },
    DeleteEdge {
        edge_id: EdgeId,
    },
    SwapEdge {
        edge_id: EdgeId,
        source: NodeId,
        target: NodeId,
    },
}

/// A node or edge named in a [`Delta`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GraphRef {
    Node(NodeId),
    Edge(EdgeId),
}

impl fmt::Display for GraphRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node_id) => write!(f, "node:{node_id}"),
            Self::Edge(edge_id) => write!(f, "edge:{edge_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    /// Ids allocated by `CreateNode`/`CreateEdge` ops, in op order.
    pub created: Vec<GraphRef>,
    pub delta: Delta,
}

/// Which objects changed since the last time the delta was taken.
///
/// Intentionally coarse: an intent whose context index changed is reported as updated,
/// without saying which entry moved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<GraphRef>,
    pub removed: Vec<GraphRef>,
    pub updated: Vec<GraphRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<GraphRef>,
    removed: BTreeSet<GraphRef>,
    updated: BTreeSet<GraphRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, graph_ref: GraphRef) {
        self.removed.remove(&graph_ref);
        self.updated.remove(&graph_ref);
        self.added.insert(graph_ref);
    }

    fn record_removed(&mut self, graph_ref: GraphRef) {
        self.updated.remove(&graph_ref);
        // Never observed by the reader, so nothing to retract.
        if self.added.remove(&graph_ref) {
            return;
        }
        self.removed.insert(graph_ref);
    }

    fn record_updated(&mut self, graph_ref: GraphRef) {
        if self.added.contains(&graph_ref) || self.removed.contains(&graph_ref) {
            return;
        }
        self.updated.insert(graph_ref);
    }

    fn absorb(&mut self, delta: &Delta) {
        for graph_ref in &delta.removed {
            self.record_removed(graph_ref.clone());
        }
        for graph_ref in &delta.added {
            self.record_added(graph_ref.clone());
        }
        for graph_ref in &delta.updated {
            self.record_updated(graph_ref.clone());
        }
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// An operation named a node or edge that is not in the graph.
    InvalidReference,
    /// The edge would break kind heterogeneity, form a self-loop, or duplicate a pair.
    IllegalEdge,
    /// A field edit was malformed or targeted a relational attribute.
    InvalidField,
    /// A batch was built against a stale revision.
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalEdgeReason {
    SelfLoop,
    SameKind(NodeKind),
    DuplicatePair { existing_edge_id: EdgeId },
}

impl fmt::Display for IllegalEdgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop => f.write_str("an edge cannot join a node to itself"),
            Self::SameKind(kind) => write!(f, "both endpoints are of kind {kind:?}"),
            Self::DuplicatePair { existing_edge_id } => {
                write!(f, "the nodes are already joined by edge {existing_edge_id}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict {
        base_rev: u64,
        current_rev: u64,
    },
    NodeNotFound {
        node_id: NodeId,
    },
    EdgeNotFound {
        edge_id: EdgeId,
    },
    IllegalEdge {
        source: NodeId,
        target: NodeId,
        reason: IllegalEdgeReason,
    },
    NotAnIntent {
        node_id: NodeId,
        field: &'static str,
    },
    RelationalField {
        field: String,
    },
    UnknownField {
        field: String,
    },
    InvalidFieldValue {
        field: &'static str,
        expected: &'static str,
    },
    NonFinitePosition {
        node_id: NodeId,
    },
}

impl ApplyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::NodeNotFound { .. } | Self::EdgeNotFound { .. } => {
                ErrorCategory::InvalidReference
            }
            Self::IllegalEdge { .. } => ErrorCategory::IllegalEdge,
            Self::NotAnIntent { .. }
            | Self::RelationalField { .. }
            | Self::UnknownField { .. }
            | Self::InvalidFieldValue { .. }
            | Self::NonFinitePosition { .. } => ErrorCategory::InvalidField,
        }
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                base_rev,
                current_rev,
            } => {
                write!(
                    f,
                    "stale base_rev (base_rev={base_rev}, current_rev={current_rev})"
                )
            }
            Self::NodeNotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::EdgeNotFound { edge_id } => write!(f, "edge not found (id={edge_id})"),
            Self::IllegalEdge {
                source,
                target,
                reason,
            } => write!(f, "illegal edge {source} -> {target}: {reason}"),
            Self::NotAnIntent { node_id, field } => {
                write!(f, "node {node_id} is not an intent and has no '{field}'")
            }
            Self::RelationalField { field } => write!(
                f,
                "'{field}' is relational and only changes through edge operations"
            ),
            Self::UnknownField { field } => write!(f, "unknown node field '{field}'"),
            Self::InvalidFieldValue { field, expected } => {
                write!(f, "invalid value for '{field}' (expected {expected})")
            }
            Self::NonFinitePosition { node_id } => {
                write!(f, "position of node {node_id} must be finite")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted per-op mutation helpers shared by `GraphStore` and batch application.
include!("ops_impl.rs");
