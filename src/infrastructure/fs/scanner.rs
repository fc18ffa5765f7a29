//! Directory scanner
//!
//! Produces the immutable `Snapshot` of a resolver root. Entries are sorted
//! by file name within each directory, and every directory is listed before
//! its contents, so two scans of an unchanged tree are identical.

use std::path::Path;

use ignore::WalkBuilder;
use tracing::debug;

use crate::domain::entities::{ScanEntry, Snapshot};
use crate::error::{TrellisError, TrellisResult};

/// One-shot recursive lister
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryScanner {
    max_depth: Option<usize>,
}

impl DirectoryScanner {
    /// Recursive scanner (every depth)
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner limited to the direct children of the root
    pub fn flat() -> Self {
        Self { max_depth: Some(1) }
    }

    /// List `root` into a snapshot.
    ///
    /// Hidden files and ignore files get no special treatment: every file and
    /// directory is listed. Links are not followed; a symlink to a directory
    /// is left out of the snapshot.
    pub fn scan(&self, root: &Path) -> TrellisResult<Snapshot> {
        if !root.is_dir() {
            return Err(TrellisError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .max_depth(self.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut entries = Vec::new();
        for result in walker {
            let entry = result.map_err(|e| match e.into_io_error() {
                Some(io) => TrellisError::Io(io),
                None => TrellisError::Io(std::io::Error::other("directory walk failed")),
            })?;
            if entry.depth() == 0 {
                continue;
            }
            if entry.path_is_symlink() && entry.path().is_dir() {
                debug!(path = %entry.path().display(), "Skipping symlinked directory");
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or_else(|_| entry.path())
                .to_path_buf();
            let is_directory = entry.file_type().is_some_and(|t| t.is_dir());
            entries.push(ScanEntry::new(relative, is_directory));
        }

        debug!(root = %root.display(), entries = entries.len(), "Scanned resolver root");

        Ok(Snapshot::new(root, entries))
    }
}
