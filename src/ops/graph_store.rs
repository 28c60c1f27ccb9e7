// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::EditorConfig;
use crate::format::{self, GraphJson, ImportOptions, ValidationError};
use crate::model::{default_graph, EdgeId, Graph, IdentifierSource, NodeId, NodeKind, Position};
use crate::store::{GraphSource, StoreError};

use super::{ApplyError, ApplyResult, Delta, DeltaBuilder, GraphRef, NodeField, Op};

/// The single owner of the canonical graph.
///
/// All mutations go through this type. Readers hold `&Graph` borrows or a [`snapshot`]
/// and learn about changes through [`rev`] and [`take_delta`].
///
/// [`snapshot`]: GraphStore::snapshot
/// [`rev`]: GraphStore::rev
/// [`take_delta`]: GraphStore::take_delta
pub struct GraphStore {
    graph: Graph,
    ids: Box<dyn IdentifierSource>,
    config: EditorConfig,
    rev: u64,
    pending: DeltaBuilder,
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("rev", &self.rev)
            .field("nodes", &self.graph.nodes().len())
            .field("edges", &self.graph.edges().len())
            .finish_non_exhaustive()
    }
}

impl GraphStore {
    pub fn new(graph: Graph, ids: impl IdentifierSource + 'static) -> Self {
        Self {
            graph,
            ids: Box::new(ids),
            config: EditorConfig::default(),
            rev: 0,
            pending: DeltaBuilder::default(),
        }
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens the graph persisted in `source`, or the default graph when nothing was saved.
    ///
    /// A saved payload goes through the same validation as an import, except that a graph
    /// without edges is accepted: `save` writes such graphs too. A save without nodes counts
    /// as nothing saved.
    pub fn load_or_default(
        source: &dyn GraphSource,
        ids: impl IdentifierSource + 'static,
        config: EditorConfig,
    ) -> Result<Self, StoreError> {
        let options = config.import.clone().with_allow_edgeless(true);
        let graph = match source.load()? {
            Some(payload) => match format::validate(payload, &options) {
                Ok(graph) => {
                    tracing::info!(
                        nodes = graph.nodes().len(),
                        edges = graph.edges().len(),
                        "loaded saved graph"
                    );
                    graph
                }
                Err(ValidationError::MissingNodes) => {
                    tracing::warn!("saved graph is empty; starting from the default graph");
                    default_graph()
                }
                Err(err) => return Err(err.into()),
            },
            None => {
                tracing::info!("no saved graph; starting from the default graph");
                default_graph()
            }
        };
        Ok(Self::new(graph, ids).with_config(config))
    }

    pub fn save(&self, source: &dyn GraphSource) -> Result<(), StoreError> {
        source.save(&format::serialize(&self.graph))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// An owned copy of the current graph, detached from later mutations.
    pub fn snapshot(&self) -> Graph {
        self.graph.clone()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Returns everything that changed since the previous call and resets the accumulator.
    pub fn take_delta(&mut self) -> Delta {
        std::mem::take(&mut self.pending).finish()
    }

    pub fn create_node(&mut self, kind: NodeKind, position: Option<Position>) -> NodeId {
        self.run(|graph, ids, title, delta| {
            super::create_node(graph, ids, kind, position, title, delta)
        })
    }

    /// Removes the node, every edge touching it, and every context reference to it.
    /// Returns `false` (and changes nothing) when the id is unknown.
    pub fn delete_node(&mut self, node_id: &NodeId) -> bool {
        self.run(|graph, _, _, delta| super::delete_node(graph, node_id, delta))
    }

    pub fn update_node_field(
        &mut self,
        node_id: &NodeId,
        field: NodeField,
    ) -> Result<(), ApplyError> {
        self.run(|graph, _, _, delta| super::update_node_field(graph, node_id, field, delta))
            .map_err(rejected)
    }

    /// String-keyed form of [`update_node_field`](Self::update_node_field).
    ///
    /// `contexts`, `id` and `type` are refused: they are derived from the edge set.
    pub fn update_node_field_by_name(
        &mut self,
        node_id: &NodeId,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), ApplyError> {
        let field = NodeField::from_name_and_value(name, value).map_err(rejected)?;
        self.update_node_field(node_id, field)
    }

    pub fn move_node(&mut self, node_id: &NodeId, position: Position) -> Result<(), ApplyError> {
        self.run(|graph, _, _, delta| super::move_node(graph, node_id, position, delta))
            .map_err(rejected)
    }

    /// Adds an edge and the context reference it implies.
    pub fn create_edge(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId, ApplyError> {
        self.run(|graph, ids, _, delta| super::create_edge(graph, ids, source, target, delta))
            .map_err(rejected)
    }

    /// Removes an edge and the context reference it implied.
    /// Returns `false` (and changes nothing) when the id is unknown.
    pub fn delete_edge(&mut self, edge_id: &EdgeId) -> bool {
        self.run(|graph, _, _, delta| super::delete_edge(graph, edge_id, delta))
    }

    /// Reattaches an existing edge, keeping its id.
    ///
    /// The context reference implied by the old endpoints is retracted and the one implied
    /// by the new endpoints is added.
    pub fn swap_edge_endpoint(
        &mut self,
        edge_id: &EdgeId,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<(), ApplyError> {
        self.run(|graph, _, _, delta| {
            super::swap_edge_endpoint(graph, edge_id, source, target, delta)
        })
        .map_err(rejected)
    }

    /// Applies `ops` as one unit: either every op is applied or the graph is untouched.
    ///
    /// `base_rev` must match [`rev`](Self::rev); a batch that changes something bumps the
    /// revision once.
    pub fn apply(&mut self, base_rev: u64, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
        if base_rev != self.rev {
            return Err(rejected(ApplyError::Conflict {
                base_rev,
                current_rev: self.rev,
            }));
        }

        if ops.is_empty() {
            return Ok(ApplyResult {
                new_rev: self.rev,
                applied: 0,
                created: Vec::new(),
                delta: Delta::default(),
            });
        }

        let mut graph = self.graph.clone();
        let mut builder = DeltaBuilder::default();
        let mut created = Vec::new();
        for (index, op) in ops.iter().enumerate() {
            let outcome = super::apply_op(
                &mut graph,
                self.ids.as_mut(),
                &self.config.new_node_title,
                op,
                &mut builder,
            );
            match outcome {
                Ok(Some(graph_ref)) => created.push(graph_ref),
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(op_index = index, error = %err, "batch rejected");
                    return Err(err);
                }
            }
        }

        self.graph = graph;
        let delta = builder.finish();
        if !delta.is_empty() {
            self.rev += 1;
            self.pending.absorb(&delta);
        }

        tracing::debug!(rev = self.rev, applied = ops.len(), "applied batch");
        Ok(ApplyResult {
            new_rev: self.rev,
            applied: ops.len(),
            created,
            delta,
        })
    }

    /// Validates `payload` with the configured import options and replaces the graph.
    /// On error the current graph is kept.
    pub fn import(&mut self, payload: GraphJson) -> Result<(), ValidationError> {
        let options = self.config.import.clone();
        self.import_with(payload, &options)
    }

    pub fn import_with(
        &mut self,
        payload: GraphJson,
        options: &ImportOptions,
    ) -> Result<(), ValidationError> {
        let graph = format::validate(payload, options).map_err(|err| {
            tracing::info!(error = %err, "import rejected");
            err
        })?;
        tracing::info!(
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            "imported graph"
        );
        self.replace_graph(graph);
        Ok(())
    }

    pub fn import_json_str(&mut self, json: &str) -> Result<(), ValidationError> {
        let payload = format::from_json_str(json)?;
        self.import(payload)
    }

    /// Swaps in an already validated graph.
    pub fn replace_graph(&mut self, graph: Graph) {
        let before = graph_refs(&self.graph);
        let after = graph_refs(&graph);

        let mut builder = DeltaBuilder::default();
        for graph_ref in before.difference(&after) {
            builder.record_removed(graph_ref.clone());
        }
        for graph_ref in after.difference(&before) {
            builder.record_added(graph_ref.clone());
        }
        for graph_ref in before.intersection(&after) {
            builder.record_updated(graph_ref.clone());
        }

        self.graph = graph;
        self.settle(builder);
    }

    /// Replaces the graph with an empty one.
    pub fn clear(&mut self) {
        tracing::info!("cleared graph");
        self.replace_graph(Graph::new());
    }

    fn run<T>(
        &mut self,
        op: impl FnOnce(&mut Graph, &mut dyn IdentifierSource, &str, &mut DeltaBuilder) -> T,
    ) -> T {
        let mut builder = DeltaBuilder::default();
        let out = op(
            &mut self.graph,
            self.ids.as_mut(),
            &self.config.new_node_title,
            &mut builder,
        );
        self.settle(builder);
        out
    }

    fn settle(&mut self, builder: DeltaBuilder) {
        let delta = builder.finish();
        if delta.is_empty() {
            return;
        }
        self.rev += 1;
        self.pending.absorb(&delta);
    }
}

fn rejected(err: ApplyError) -> ApplyError {
    tracing::debug!(category = ?err.category(), error = %err, "operation rejected");
    err
}

fn graph_refs(graph: &Graph) -> BTreeSet<GraphRef> {
    graph
        .nodes()
        .iter()
        .map(|node| GraphRef::Node(node.id().clone()))
        .chain(graph.edges().iter().map(|edge| GraphRef::Edge(edge.id().clone())))
        .collect()
}
