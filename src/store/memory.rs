// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;

use super::{GraphSource, StoreError};
use crate::format::{from_json_str, FormatError, GraphJson};

/// A single in-process slot holding the serialized graph as a JSON string, the way a
/// browser's local storage would.
#[derive(Debug, Default)]
pub struct MemorySource {
    slot: RefCell<Option<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(json.into())),
        }
    }

    /// The raw stored string, if anything was saved.
    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl GraphSource for MemorySource {
    fn load(&self) -> Result<Option<GraphJson>, StoreError> {
        let slot = self.slot.borrow();
        let Some(json) = slot.as_deref() else {
            return Ok(None);
        };
        Ok(Some(from_json_str(json)?))
    }

    fn save(&self, graph: &GraphJson) -> Result<(), StoreError> {
        let json = serde_json::to_string(graph).map_err(FormatError::Json)?;
        *self.slot.borrow_mut() = Some(json);
        Ok(())
    }
}
