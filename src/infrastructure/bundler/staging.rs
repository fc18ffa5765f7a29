//! Staging bundler
//!
//! Copies the entry file verbatim into the artifact directory. No
//! transpilation happens here; unless source maps are excluded an identity
//! inline source map is appended so stack traces point at the original file.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use super::{artifact_path, content_address};
use crate::domain::ports::{BundleError, Bundler, BundlingOptions, CodeRef, FileSystem};
use crate::domain::value_objects::SourceExtension;
use crate::infrastructure::fs::LocalFs;

/// Copy-only bundler writing to `<out_dir>/<hash>/index.<ext>`
#[derive(Debug, Clone)]
pub struct StagingBundler<F: FileSystem = LocalFs> {
    out_dir: PathBuf,
    fs: F,
}

impl StagingBundler<LocalFs> {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            fs: LocalFs::new(),
        }
    }
}

impl<F: FileSystem> StagingBundler<F> {
    pub fn with_fs(out_dir: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            out_dir: out_dir.into(),
            fs,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl<F: FileSystem> Bundler for StagingBundler<F> {
    fn bundle(&self, entry: &Path, options: &BundlingOptions) -> Result<CodeRef, BundleError> {
        let ext = SourceExtension::from_path(entry)
            .ok_or_else(|| BundleError::new(entry, "unsupported source extension"))?;
        let bytes = self
            .fs
            .read(entry)
            .map_err(|e| BundleError::new(entry, e.to_string()))?;

        let hash = content_address(entry, &bytes, options);
        let path = artifact_path(&self.out_dir, &hash, ext.as_str());

        if self.fs.is_file(&path) {
            debug!(entry = %entry.display(), hash = hash.short(), "Bundle cache hit");
            return Ok(CodeRef::Asset { hash, path });
        }

        let mut artifact = bytes;
        if !options.exclude_source_map {
            let source = std::str::from_utf8(&artifact)
                .map_err(|e| BundleError::new(entry, format!("source is not valid UTF-8: {e}")))?
                .to_owned();
            if !source.ends_with('\n') && !source.is_empty() {
                artifact.push(b'\n');
            }
            let name = entry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            artifact.extend_from_slice(inline_source_map(&name, &source).as_bytes());
            artifact.push(b'\n');
        }

        self.fs
            .write(&path, &artifact)
            .map_err(|e| BundleError::new(entry, e.to_string()))?;
        debug!(entry = %entry.display(), hash = hash.short(), "Bundled entry");

        Ok(CodeRef::Asset { hash, path })
    }
}

/// Identity source map: line N of the artifact maps to line N of the source.
fn inline_source_map(file_name: &str, source: &str) -> String {
    let lines = source.lines().count().max(1);
    let mappings = std::iter::once("AAAA")
        .chain(std::iter::repeat("AACA").take(lines - 1))
        .collect::<Vec<_>>()
        .join(";");
    let map = serde_json::json!({
        "version": 3,
        "sources": [file_name],
        "sourcesContent": [source],
        "names": [],
        "mappings": mappings,
    });
    format!(
        "//# sourceMappingURL=data:application/json;charset=utf-8;base64,{}",
        general_purpose::STANDARD.encode(map.to_string())
    )
}
