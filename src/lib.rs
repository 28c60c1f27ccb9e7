// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dialograph: the consistency engine behind a conversational-agent intent graph editor.
//!
//! Intent nodes keep a mirrored index of the context nodes wired to them. Every mutation
//! goes through [`ops::GraphStore`], which keeps that index and the edge set in step and
//! rejects edges that join two nodes of the same kind.

pub mod config;
pub mod format;
pub mod model;
pub mod ops;
pub mod store;

pub use config::EditorConfig;
pub use model::{default_graph, Graph, NodeId, NodeKind};
pub use ops::GraphStore;
