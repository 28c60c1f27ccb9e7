// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence collaborators.
//!
//! A [`GraphSource`] hands out and accepts the plain serialized tree; validation before a
//! payload replaces a live graph happens in `GraphStore`, not here.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Deserialize;

use crate::format::{FormatError, GraphJson, ValidationError};

mod graph_file;
mod history;
mod memory;

pub use graph_file::GraphFile;
pub use history::{VersionDoc, VersionLog};
pub use memory::MemorySource;

/// Somewhere a serialized graph can be read from and written back to.
pub trait GraphSource {
    /// `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<GraphJson>, StoreError>;

    fn save(&self, graph: &GraphJson) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place, without fsync.
    #[default]
    BestEffort,

    /// Also syncs the file contents and the parent directory where the platform allows.
    Durable,
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Format(FormatError),
    Validation(ValidationError),
    UnknownVersion {
        index: usize,
        len: usize,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::Format(source) => write!(f, "stored graph is malformed: {source}"),
            Self::Validation(source) => write!(f, "stored graph was rejected: {source}"),
            Self::UnknownVersion { index, len } => {
                write!(f, "no saved version {index} (have {len})")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Format(source) => Some(source),
            Self::Validation(source) => Some(source),
            Self::UnknownVersion { .. } => None,
        }
    }
}

impl From<FormatError> for StoreError {
    fn from(source: FormatError) -> Self {
        Self::Format(source)
    }
}

impl From<ValidationError> for StoreError {
    fn from(source: ValidationError) -> Self {
        Self::Validation(source)
    }
}
