// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{GraphSource, StoreError, WriteDurability};
use crate::format::{ExportEnvelope, GraphJson};

/// A graph persisted as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct GraphFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl GraphFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    /// Writes `envelope` in place of a bare graph.
    pub fn save_envelope(&self, envelope: &ExportEnvelope) -> Result<(), StoreError> {
        write_json(&self.path, envelope, self.durability)?;
        tracing::debug!(path = %self.path.display(), agent = %envelope.agent, "saved export");
        Ok(())
    }
}

impl GraphSource for GraphFile {
    fn load(&self) -> Result<Option<GraphJson>, StoreError> {
        read_json(&self.path)
    }

    fn save(&self, graph: &GraphJson) -> Result<(), StoreError> {
        write_json(&self.path, graph, self.durability)?;
        tracing::debug!(path = %self.path.display(), "saved graph");
        Ok(())
    }
}

/// Reads and parses `path`; a missing file is `Ok(None)`.
pub(super) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}

pub(super) fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let mut contents = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    contents.push(b'\n');
    write_atomic(path, &contents, durability)
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` next to `path` under a temp name, then renames over `path`, so readers
/// see either the old file or the new one.
fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let io_error = |path: &Path, source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(io_error(path, io::Error::other("path has no file name")));
    };
    // `Path::parent` of a bare file name is the empty path.
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".dialograph.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| io_error(tmp_path.as_path(), source))?;
    file.write_all(contents)
        .map_err(|source| io_error(tmp_path.as_path(), source))?;
    if durability == WriteDurability::Durable {
        file.sync_all()
            .map_err(|source| io_error(tmp_path.as_path(), source))?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(path, source));
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| io_error(parent, source))?;
            dir.sync_all().map_err(|source| io_error(parent, source))?;
        }
    }

    Ok(())
}
