// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::graph_file::{read_json, write_json};
use super::{StoreError, WriteDurability};
use crate::format::{serialize, validate, GraphJson, ImportOptions};
use crate::model::Graph;

/// One saved version: when it was taken (ms since the unix epoch) and the graph itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionDoc {
    pub date: u64,
    pub graph: GraphJson,
}

/// Saved versions of a graph, oldest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VersionLog {
    #[serde(default)]
    versions: Vec<VersionDoc>,
}

impl VersionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a log written by [`save_to`](Self::save_to); a missing file is an empty log.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        Ok(read_json(path)?.unwrap_or_default())
    }

    pub fn save_to(&self, path: &Path, durability: WriteDurability) -> Result<(), StoreError> {
        write_json(path, self, durability)
    }

    /// Appends a version stamped with the current time and returns its index.
    pub fn record(&mut self, graph: &Graph) -> usize {
        let date = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        self.record_at(graph, date)
    }

    pub fn record_at(&mut self, graph: &Graph, date: u64) -> usize {
        self.versions.push(VersionDoc {
            date,
            graph: serialize(graph),
        });
        self.versions.len() - 1
    }

    pub fn docs(&self) -> &[VersionDoc] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn latest(&self) -> Option<&VersionDoc> {
        self.versions.last()
    }

    /// Validates the stored version at `index` so it can replace a live graph.
    pub fn restore(&self, index: usize, options: &ImportOptions) -> Result<Graph, StoreError> {
        let Some(doc) = self.versions.get(index) else {
            return Err(StoreError::UnknownVersion {
                index,
                len: self.versions.len(),
            });
        };
        Ok(validate(doc.graph.clone(), options)?)
    }
}

#[cfg(test)]
mod tests {
    use super::VersionLog;
    use crate::format::{ImportOptions, ValidationError};
    use crate::model::{default_graph, Graph};
    use crate::store::testing::TempDir;
    use crate::store::{StoreError, WriteDurability};

    #[test]
    fn records_are_kept_in_order() {
        let mut log = VersionLog::new();
        assert!(log.latest().is_none());

        assert_eq!(log.record_at(&default_graph(), 1_599_613_771_574), 0);
        assert_eq!(log.record(&default_graph()), 1);

        assert_eq!(log.len(), 2);
        assert_eq!(log.docs()[0].date, 1_599_613_771_574);
        assert!(log.latest().is_some_and(|doc| doc.date >= 1_599_613_771_574));
    }

    #[test]
    fn restore_validates_the_stored_graph() {
        let mut log = VersionLog::new();
        log.record_at(&default_graph(), 1);
        log.record_at(&Graph::new(), 2);

        let restored = log.restore(0, &ImportOptions::default()).expect("restore");
        assert_eq!(restored, default_graph());

        let err = log
            .restore(1, &ImportOptions::default())
            .expect_err("empty graph");
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::MissingNodes)
        ));

        let err = log.restore(7, &ImportOptions::default()).expect_err("unknown");
        assert!(matches!(err, StoreError::UnknownVersion { index: 7, len: 2 }));
    }

    #[test]
    fn log_survives_a_save_and_load() {
        let tmp = TempDir::new("history");
        let path = tmp.path().join("versions.json");
        assert_eq!(VersionLog::load_from(&path).expect("missing"), VersionLog::new());

        let mut log = VersionLog::new();
        log.record_at(&default_graph(), 42);
        log.save_to(&path, WriteDurability::BestEffort).expect("save");

        let json = std::fs::read_to_string(&path).expect("read");
        assert!(json.contains("\"date\": 42"));
        assert_eq!(VersionLog::load_from(&path).expect("load"), log);
    }
}
