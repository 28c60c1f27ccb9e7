// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use super::ids::NodeId;

/// The two node variants of an intent graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Intent,
    Context,
}

impl NodeKind {
    /// The `type` tag used by the persisted format.
    pub fn as_type_str(self) -> &'static str {
        match self {
            Self::Intent => "intentNode",
            Self::Context => "contextNode",
        }
    }
}

/// Which side of an intent a context sits on.
///
/// `In`: the context is the edge source and gates the intent.
/// `Out`: the context is the edge target and is set by the intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    In,
    Out,
}

/// Canvas coordinates. Carried through unchanged; nothing in the engine interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// JSON has no representation for NaN or infinities.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

type LinkList = SmallVec<[NodeId; 4]>;

/// The denormalized `contexts.in` / `contexts.out` index of an intent.
///
/// Only the crate mutates it, so that every entry stays mirrored by exactly one edge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextLinks {
    input: LinkList,
    output: LinkList,
}

impl ContextLinks {
    pub(crate) fn from_lists(
        input: impl IntoIterator<Item = NodeId>,
        output: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        Self {
            input: input.into_iter().collect(),
            output: output.into_iter().collect(),
        }
    }

    pub fn get(&self, direction: Direction) -> &[NodeId] {
        match direction {
            Direction::In => &self.input,
            Direction::Out => &self.output,
        }
    }

    pub fn input(&self) -> &[NodeId] {
        &self.input
    }

    pub fn output(&self) -> &[NodeId] {
        &self.output
    }

    pub fn contains(&self, direction: Direction, context_id: &NodeId) -> bool {
        self.get(direction).contains(context_id)
    }

    pub(crate) fn list_mut(&mut self, direction: Direction) -> &mut LinkList {
        match direction {
            Direction::In => &mut self.input,
            Direction::Out => &mut self.output,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.input.clear();
        self.output.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextNode {
    id: NodeId,
    title: String,
    position: Option<Position>,
}

impl ContextNode {
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            position: None,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentNode {
    id: NodeId,
    title: String,
    position: Option<Position>,
    events: Vec<String>,
    training_phrases: Vec<String>,
    action: String,
    payload: String,
    responses: Vec<Vec<String>>,
    fulfillment: bool,
    is_fallback: bool,
    contexts: ContextLinks,
}

impl IntentNode {
    /// An intent with default attributes: empty lists and strings, no fulfillment, not a
    /// fallback, no contexts.
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            position: None,
            events: Vec::new(),
            training_phrases: Vec::new(),
            action: String::new(),
            payload: String::new(),
            responses: Vec::new(),
            fulfillment: false,
            is_fallback: false,
            contexts: ContextLinks::default(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn training_phrases(&self) -> &[String] {
        &self.training_phrases
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn responses(&self) -> &[Vec<String>] {
        &self.responses
    }

    pub fn fulfillment(&self) -> bool {
        self.fulfillment
    }

    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    pub fn contexts(&self) -> &ContextLinks {
        &self.contexts
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    pub fn set_events(&mut self, events: Vec<String>) {
        self.events = events;
    }

    pub fn set_training_phrases(&mut self, training_phrases: Vec<String>) {
        self.training_phrases = training_phrases;
    }

    pub fn set_action(&mut self, action: impl Into<String>) {
        self.action = action.into();
    }

    pub fn set_payload(&mut self, payload: impl Into<String>) {
        self.payload = payload.into();
    }

    pub fn set_responses(&mut self, responses: Vec<Vec<String>>) {
        self.responses = responses;
    }

    pub fn set_fulfillment(&mut self, fulfillment: bool) {
        self.fulfillment = fulfillment;
    }

    pub fn set_is_fallback(&mut self, is_fallback: bool) {
        self.is_fallback = is_fallback;
    }

    pub(crate) fn contexts_mut(&mut self) -> &mut ContextLinks {
        &mut self.contexts
    }

    /// Used by the deserializer, which copies the stored index verbatim.
    pub(crate) fn with_contexts(mut self, contexts: ContextLinks) -> Self {
        self.contexts = contexts;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Intent(IntentNode),
    Context(ContextNode),
}

impl Node {
    pub fn new(kind: NodeKind, id: NodeId, title: impl Into<String>) -> Self {
        match kind {
            NodeKind::Intent => Self::Intent(IntentNode::new(id, title)),
            NodeKind::Context => Self::Context(ContextNode::new(id, title)),
        }
    }

    pub fn id(&self) -> &NodeId {
        match self {
            Self::Intent(node) => node.id(),
            Self::Context(node) => node.id(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Intent(_) => NodeKind::Intent,
            Self::Context(_) => NodeKind::Context,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Intent(node) => node.title(),
            Self::Context(node) => node.title(),
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Intent(node) => node.position(),
            Self::Context(node) => node.position(),
        }
    }

    pub fn as_intent(&self) -> Option<&IntentNode> {
        match self {
            Self::Intent(node) => Some(node),
            Self::Context(_) => None,
        }
    }

    pub fn as_context(&self) -> Option<&ContextNode> {
        match self {
            Self::Context(node) => Some(node),
            Self::Intent(_) => None,
        }
    }

    pub(crate) fn as_intent_mut(&mut self) -> Option<&mut IntentNode> {
        match self {
            Self::Intent(node) => Some(node),
            Self::Context(_) => None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        match self {
            Self::Intent(node) => node.set_title(title),
            Self::Context(node) => node.set_title(title),
        }
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        match self {
            Self::Intent(node) => node.set_position(position),
            Self::Context(node) => node.set_position(position),
        }
    }
}

impl From<IntentNode> for Node {
    fn from(node: IntentNode) -> Self {
        Self::Intent(node)
    }
}

impl From<ContextNode> for Node {
    fn from(node: ContextNode) -> Self {
        Self::Context(node)
    }
}
