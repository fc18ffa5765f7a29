//! Scan snapshot entities
//!
//! A `Snapshot` is the immutable, ordered listing of a resolver root taken
//! once when the API root is constructed. Every data-source registration
//! re-reads the same snapshot, so files created on disk afterwards are never
//! seen.

use std::path::{Path, PathBuf};

/// One file or directory found under the resolver root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    relative_path: PathBuf,
    name: String,
    is_directory: bool,
}

impl ScanEntry {
    pub fn new(relative_path: impl Into<PathBuf>, is_directory: bool) -> Self {
        let relative_path = relative_path.into();
        let name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            relative_path,
            name,
            is_directory,
        }
    }

    /// Path relative to the snapshot root
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Final path component
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Relative path of the containing directory (empty for root children)
    pub fn parent(&self) -> &Path {
        self.relative_path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Immutable recursive listing of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    root: PathBuf,
    entries: Vec<ScanEntry>,
}

impl Snapshot {
    pub fn new(root: impl Into<PathBuf>, entries: Vec<ScanEntry>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute (root-joined) path of an entry
    pub fn absolute(&self, entry: &ScanEntry) -> PathBuf {
        self.root.join(&entry.relative_path)
    }

    /// Direct children of the directory at `relative`, in snapshot order
    pub fn children_of<'a>(&'a self, relative: &'a Path) -> impl Iterator<Item = &'a ScanEntry> {
        self.entries.iter().filter(move |e| e.parent() == relative)
    }
}
