// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor settings.

use std::path::Path;

use serde::Deserialize;

use crate::format::ImportOptions;
use crate::store::{StoreError, WriteDurability};

/// Knobs for a [`GraphStore`](crate::ops::GraphStore) session.
///
/// Read from a JSON file; every key is optional.
///
/// ```json
/// {
///   "import": { "allow_edgeless": false, "integrity": "verify" },
///   "new_node_title": "",
///   "durability": "durable"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub import: ImportOptions,
    /// Title given to nodes spawned by `create_node`.
    pub new_node_title: String,
    pub durability: WriteDurability,
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_import(mut self, import: ImportOptions) -> Self {
        self.import = import;
        self
    }

    pub fn with_new_node_title(mut self, title: impl Into<String>) -> Self {
        self.new_node_title = title.into();
        self
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }
}
