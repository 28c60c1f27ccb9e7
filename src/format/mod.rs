// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persisted/exchanged graph format.
//!
//! [`json`] is the plain tree written to storage and sent on export; [`validate`] gates
//! every payload before it may replace a live graph.

pub mod json;
pub mod validate;

pub use json::{
    deserialize, from_json_str, graph_json_schema, serialize, to_json_string, ContextJson,
    ContextsJson, EdgeJson, EdgeType, ExportEnvelope, FormatError, GraphJson, IntentJson,
    NodeJson,
};
pub use validate::{validate, validate_value, ImportOptions, IntegrityMode, ValidationError};
