// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Import gate for payloads that will replace a live graph.

use std::fmt;

use serde::Deserialize;

use super::json::{deserialize, FormatError, GraphJson};
use crate::model::Graph;
use crate::ops::{check_consistency, rederive, Violation};

/// How far an import trusts the serialized `contexts` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityMode {
    /// Accept the indices as written.
    #[default]
    Trust,
    /// Reject payloads whose indices or edges break an invariant.
    Verify,
    /// Drop unmirrorable edges and rebuild every index from the edge set.
    Repair,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Accept graphs that have nodes but no edges.
    pub allow_edgeless: bool,
    pub integrity: IntegrityMode,
}

impl ImportOptions {
    pub fn with_allow_edgeless(mut self, allow_edgeless: bool) -> Self {
        self.allow_edgeless = allow_edgeless;
        self
    }

    pub fn with_integrity(mut self, integrity: IntegrityMode) -> Self {
        self.integrity = integrity;
        self
    }
}

#[derive(Debug)]
pub enum ValidationError {
    Format(FormatError),
    MissingNodes,
    MissingEdges,
    Inconsistent { violations: Vec<Violation> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(source) => write!(f, "{source}"),
            Self::MissingNodes => f.write_str("graph has no nodes"),
            Self::MissingEdges => f.write_str("graph has no edges"),
            Self::Inconsistent { violations } => {
                write!(f, "graph is inconsistent ({} violations)", violations.len())?;
                if let Some(first) = violations.first() {
                    write!(f, "; first: {first}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(source) => Some(source),
            Self::MissingNodes | Self::MissingEdges | Self::Inconsistent { .. } => None,
        }
    }
}

impl From<FormatError> for ValidationError {
    fn from(source: FormatError) -> Self {
        Self::Format(source)
    }
}

/// Accepts `payload` only when it has nodes and (unless `allow_edgeless`) edges, then
/// applies the configured [`IntegrityMode`].
pub fn validate(payload: GraphJson, options: &ImportOptions) -> Result<Graph, ValidationError> {
    if payload.nodes.is_empty() {
        return Err(ValidationError::MissingNodes);
    }
    if payload.edges.is_empty() && !options.allow_edgeless {
        return Err(ValidationError::MissingEdges);
    }

    let mut graph = deserialize(payload)?;

    match options.integrity {
        IntegrityMode::Trust => {}
        IntegrityMode::Verify => {
            let violations = check_consistency(&graph);
            if !violations.is_empty() {
                return Err(ValidationError::Inconsistent { violations });
            }
        }
        IntegrityMode::Repair => {
            let duplicates: Vec<_> = check_consistency(&graph)
                .into_iter()
                .filter(|violation| matches!(violation, Violation::DuplicateNodeId { .. }))
                .collect();
            if !duplicates.is_empty() {
                return Err(ValidationError::Inconsistent {
                    violations: duplicates,
                });
            }

            let report = rederive(&mut graph);
            if !report.is_clean() {
                tracing::warn!(
                    dropped_edges = report.dropped_edges.len(),
                    reindexed_intents = report.reindexed_intents.len(),
                    "repaired imported graph"
                );
            }
        }
    }

    Ok(graph)
}

/// [`validate`] for a payload that is still an untyped JSON value.
pub fn validate_value(
    value: serde_json::Value,
    options: &ImportOptions,
) -> Result<Graph, ValidationError> {
    let payload: GraphJson = serde_json::from_value(value).map_err(FormatError::Json)?;
    validate(payload, options)
}
