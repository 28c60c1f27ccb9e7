// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{
    ContextLinks, ContextNode, Edge, EdgeId, Graph, Id, IdError, IntentNode, Node, NodeId,
    Position,
};

/// The plain tree a graph is stored and exchanged as.
///
/// Missing collections deserialize as empty so that [`validate`](super::validate) can report
/// them as such instead of failing with a parse error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct GraphJson {
    #[serde(default)]
    pub nodes: Vec<NodeJson>,
    #[serde(default)]
    pub edges: Vec<EdgeJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum NodeJson {
    #[serde(rename = "intentNode")]
    Intent(IntentJson),
    #[serde(rename = "contextNode")]
    Context(ContextJson),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntentJson {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default)]
    pub contexts: ContextsJson,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub training_phrases: Vec<String>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub responses: Vec<Vec<String>>,
    #[serde(default)]
    pub fulfillment: bool,
    #[serde(default)]
    pub is_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ContextsJson {
    #[serde(rename = "in", default)]
    pub input: Vec<String>,
    #[serde(rename = "out", default)]
    pub output: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContextJson {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeJson {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: EdgeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum EdgeType {
    #[default]
    #[serde(rename = "basicEdge")]
    Basic,
}

/// The body posted to an agent export endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExportEnvelope {
    pub agent: String,
    pub graph: GraphJson,
}

impl ExportEnvelope {
    pub fn new(agent: impl Into<String>, graph: &Graph) -> Self {
        Self {
            agent: agent.into(),
            graph: serialize(graph),
        }
    }
}

#[derive(Debug)]
pub enum FormatError {
    Json(serde_json::Error),
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(source) => write!(f, "malformed graph json: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid {field} {value:?}: {source}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(source) => Some(source),
            Self::InvalidId { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json(source)
    }
}

fn position_json(position: Option<Position>) -> (Option<f64>, Option<f64>) {
    match position {
        Some(Position { x, y }) => (Some(x), Some(y)),
        None => (None, None),
    }
}

fn position_from_json(x: Option<f64>, y: Option<f64>) -> Option<Position> {
    Some(Position::new(x?, y?))
}

fn ids_json(ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_owned()).collect()
}

/// Structural copy of `graph` into the plain tree. Nothing is checked or rewritten.
pub fn serialize(graph: &Graph) -> GraphJson {
    let nodes = graph
        .nodes()
        .iter()
        .map(|node| match node {
            Node::Intent(intent) => {
                let (x, y) = position_json(intent.position());
                NodeJson::Intent(IntentJson {
                    id: intent.id().as_str().to_owned(),
                    title: intent.title().to_owned(),
                    x,
                    y,
                    contexts: ContextsJson {
                        input: ids_json(intent.contexts().input()),
                        output: ids_json(intent.contexts().output()),
                    },
                    events: intent.events().to_vec(),
                    training_phrases: intent.training_phrases().to_vec(),
                    action: intent.action().to_owned(),
                    payload: intent.payload().to_owned(),
                    responses: intent.responses().to_vec(),
                    fulfillment: intent.fulfillment(),
                    is_fallback: intent.is_fallback(),
                })
            }
            Node::Context(context) => {
                let (x, y) = position_json(context.position());
                NodeJson::Context(ContextJson {
                    id: context.id().as_str().to_owned(),
                    title: context.title().to_owned(),
                    x,
                    y,
                })
            }
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| EdgeJson {
            id: edge.id().as_str().to_owned(),
            source: edge.source().as_str().to_owned(),
            target: edge.target().as_str().to_owned(),
            kind: EdgeType::Basic,
        })
        .collect();

    GraphJson { nodes, edges }
}

fn parse_id<T>(field: &'static str, value: String) -> Result<Id<T>, FormatError> {
    Id::new(value.clone()).map_err(|source| FormatError::InvalidId {
        field,
        value,
        source,
    })
}

fn parse_ids(field: &'static str, values: Vec<String>) -> Result<Vec<NodeId>, FormatError> {
    values
        .into_iter()
        .map(|value| parse_id(field, value))
        .collect()
}

/// Rebuilds a graph from the plain tree.
///
/// Only identifier syntax is checked. Context indices are taken as written; see
/// [`validate`](super::validate) for the checks that guard a live graph.
pub fn deserialize(payload: GraphJson) -> Result<Graph, FormatError> {
    let mut nodes = Vec::with_capacity(payload.nodes.len());
    for node in payload.nodes {
        let node = match node {
            NodeJson::Intent(intent) => {
                let contexts = ContextLinks::from_lists(
                    parse_ids("contexts.in entry", intent.contexts.input)?,
                    parse_ids("contexts.out entry", intent.contexts.output)?,
                );
                let mut node =
                    IntentNode::new(parse_id("node id", intent.id)?, intent.title)
                        .with_contexts(contexts);
                node.set_position(position_from_json(intent.x, intent.y));
                node.set_events(intent.events);
                node.set_training_phrases(intent.training_phrases);
                node.set_action(intent.action);
                node.set_payload(intent.payload);
                node.set_responses(intent.responses);
                node.set_fulfillment(intent.fulfillment);
                node.set_is_fallback(intent.is_fallback);
                Node::Intent(node)
            }
            NodeJson::Context(context) => {
                let mut node = ContextNode::new(parse_id("node id", context.id)?, context.title);
                node.set_position(position_from_json(context.x, context.y));
                Node::Context(node)
            }
        };
        nodes.push(node);
    }

    let edges = payload
        .edges
        .into_iter()
        .map(|edge| {
            let edge_id: EdgeId = parse_id("edge id", edge.id)?;
            Ok(Edge::new(
                edge_id,
                parse_id("edge source", edge.source)?,
                parse_id("edge target", edge.target)?,
            ))
        })
        .collect::<Result<Vec<_>, FormatError>>()?;

    Ok(Graph::from_parts(nodes, edges))
}

pub fn from_json_str(json: &str) -> Result<GraphJson, FormatError> {
    Ok(serde_json::from_str(json)?)
}

/// Pretty-printed JSON for `graph`.
pub fn to_json_string(graph: &Graph) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&serialize(graph))?)
}

/// JSON schema describing [`GraphJson`].
pub fn graph_json_schema() -> serde_json::Value {
    schemars::schema_for!(GraphJson).to_value()
}
