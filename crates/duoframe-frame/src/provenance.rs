//! Where a frame's data came from.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Built from an in-memory dataset.
    Memory,
    /// Loaded from a file on disk.
    File(PathBuf),
    /// Loaded from one member of a zip archive. The extracted copy is gone by
    /// the time the frame exists, so the archive is the on-disk source.
    Archive { archive: PathBuf, member: String },
}

/// Filesystem facts about a frame's source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl Provenance {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Provenance::Memory => None,
            Provenance::File(p) => Some(p),
            Provenance::Archive { archive, .. } => Some(archive),
        }
    }

    /// Stat the source file. `None` without a source or when it no longer exists.
    pub fn metadata(&self) -> Option<FileMetadata> {
        let path = self.path()?;
        let meta = fs::metadata(path).ok()?;
        Some(FileMetadata {
            path: path.to_path_buf(),
            size: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}
