// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A graph holds intent and context nodes plus the edges between them. Every intent keeps a
//! denormalized copy of its incoming/outgoing context ids; `crate::ops` keeps that copy in
//! step with the edge set.

pub(crate) mod fixtures;
pub mod graph;
pub mod ids;
pub mod node;

pub use fixtures::default_graph;
pub use graph::{Edge, EdgeKind, Graph};
pub use ids::{
    EdgeId, Id, IdError, IdentifierSource, NodeId, SequentialSource, Token, UuidSource,
};
pub use node::{ContextLinks, ContextNode, Direction, IntentNode, Node, NodeKind, Position};
